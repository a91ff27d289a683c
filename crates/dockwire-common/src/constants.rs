//! Wire-level constants shared by the client and the CLI.

/// Daemon endpoint used when neither configuration nor environment names one.
pub const DEFAULT_API_ROOT: &str = "http://localhost:2375";

/// Environment variable naming the daemon endpoint.
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Environment variable pinning the remote API version.
pub const DOCKER_API_VERSION_ENV: &str = "DOCKER_API_VERSION";

/// Environment variable holding the request timeout in seconds.
pub const DOCKER_TIMEOUT_ENV: &str = "DOCKER_CLIENT_TIMEOUT";

/// Media type for JSON request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type requested from the logs endpoint to receive multiplexed frames.
pub const RAW_STREAM_MEDIA_TYPE: &str = "application/vnd.docker.raw-stream";

/// Media type of a build context upload.
pub const TAR_MEDIA_TYPE: &str = "application/tar";

/// Size of a multiplexed stream frame header in bytes.
pub const FRAME_HEADER_LEN: usize = 8;

/// Message reported when a build stream never names the built image.
pub const BUILD_ID_MISSING: &str = "Can't obtain ID from build output stream.";

/// Application name used in CLI output.
pub const APP_NAME: &str = "dockwire";
