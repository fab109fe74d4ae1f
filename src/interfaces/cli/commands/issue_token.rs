//! Issue admin bearer token command

use crate::api::jwt::JwtService;
use crate::config::get_config;
use crate::interfaces::cli::CliError;

/// 打印 access token（只输出 token 本身，便于脚本使用）
///
/// 需要配置固定的 api.jwt_secret，否则签出的 token 对运行中的服务无效。
pub fn issue_token() -> Result<(), CliError> {
    let config = get_config();

    if config.api.admin_token.is_empty() {
        return Err(CliError::CommandError(
            "api.admin_token is empty, admin API is disabled".to_string(),
        ));
    }
    if config.api.jwt_secret.is_empty() {
        return Err(CliError::CommandError(
            "api.jwt_secret must be configured to issue tokens outside the server".to_string(),
        ));
    }

    let token = JwtService::from_config(&config.api)
        .generate_access_token()
        .map_err(|e| CliError::CommandError(format!("Failed to sign token: {}", e)))?;

    println!("{}", token);
    Ok(())
}
