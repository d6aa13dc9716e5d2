//! Network URL constants for the AMS SDK.

/// Default base URL of the hosted AMS service.
pub const DEFAULT_SERVER_URL: &str = "https://www.amscloud.com";

/// Fixed base path of the open REST API, joined onto the server URL.
pub const API_PREFIX: &str = "/api/ams_open/v1";
