pub mod folder_source;
pub mod http_still_source;
