pub mod imgbb;
