// Assertion helpers shared by the scenario catalog

use anyhow::{bail, ensure};
use std::fmt::Debug;

use crate::modules::api::{ApiResponse, ErrorResponse};

/// Fail unless the response carries `expected`
pub fn expect_status<T: Debug>(response: &ApiResponse<T>, expected: u16, action: &str) -> anyhow::Result<()> {
    ensure!(
        response.status == expected,
        "{}: expected status {}, got {} ({:?})",
        action,
        expected,
        response.status,
        response.body
    );
    Ok(())
}

/// Expect a 2xx with `expected` status and hand back the parsed body
pub fn expect_body<T: Debug>(response: ApiResponse<T>, expected: u16, action: &str) -> anyhow::Result<T> {
    expect_status(&response, expected, action)?;
    match response.body {
        Ok(body) => Ok(body),
        Err(error) => bail!("{}: status {} carried an error body: {}", action, expected, error),
    }
}

/// Expect a failure with `expected` status and a non-empty error code and message
pub fn expect_error<T: Debug>(
    response: ApiResponse<T>,
    expected: u16,
    action: &str,
) -> anyhow::Result<ErrorResponse> {
    expect_status(&response, expected, action)?;
    match response.body {
        Ok(body) => bail!("{}: status {} parsed as success: {:?}", action, expected, body),
        Err(error) => {
            ensure!(
                error.is_well_formed(),
                "{}: error envelope missing code or message: {:?}",
                action,
                error
            );
            Ok(error)
        }
    }
}
