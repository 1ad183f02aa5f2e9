//! AWS SDK configuration shared by the Data API and Bedrock clients.

const DEFAULT_REGION: &str = "us-east-1";

/// Resolves the one SDK config every service client is built from.
///
/// Credentials always come from the SDK default chain (environment,
/// shared credentials/config files, instance roles); the only knob the
/// settings expose is the region, falling back to us-east-1 when unset.
pub async fn sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let region = aws_config::Region::new(region.unwrap_or(DEFAULT_REGION).to_string());
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(region)
        .load()
        .await
}
