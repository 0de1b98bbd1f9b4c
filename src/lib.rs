pub mod radiometry;
pub mod logger;
