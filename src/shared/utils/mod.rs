pub mod absolute_url;
