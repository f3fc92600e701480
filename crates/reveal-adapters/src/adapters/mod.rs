pub mod cpanel;
pub mod domain;
pub mod help;
pub mod imports;
pub mod ssl;
