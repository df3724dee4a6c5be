pub mod build_info;
pub mod config;
pub mod coordinator;
pub mod csv;
pub mod error;
pub mod grid;
pub mod image;
pub mod init;
pub mod par_slice;
pub mod partition;
pub mod relax_cli;
pub mod solver;
pub mod util;
pub mod worker;
