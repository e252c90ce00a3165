pub mod build;
pub mod generate;
pub mod init;
pub mod preview;
pub mod publish;
pub mod quick;
