// notifkit: post-processing helpers for push notification payloads.
//
// This is the library root. `image` and `body` hold the two text parsers,
// `http` the JSON request helper, and `notification` ties the parsers
// together over a whole payload.

pub mod body;
pub mod config;
pub mod http;
pub mod image;
pub mod notification;
pub mod output;
