pub mod admission;
pub mod network;
pub mod pasv;
