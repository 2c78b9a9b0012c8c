//! OS version values and the developer mode switch.

use super::{capture, Field};

/// First build number shipped as Windows 11.
pub const WINDOWS_11_FIRST_BUILD: u32 = 22000;

/// Values read from the `CurrentVersion` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsVersionFacts {
    pub os_name: Option<String>,
    pub windows_version: Option<String>,
    pub build_number: Option<String>,
    pub display_version: Option<String>,
}

/// Parse `reg query` output of the `CurrentVersion` key.
///
/// Windows 11 still reports "Windows 10" in `ProductName`; the build number
/// decides.
pub fn parse_os_version(output: &str) -> OsVersionFacts {
    let os_name = capture(Field::ProductName, output);
    let build_number = capture(Field::CurrentBuildNumber, output);
    let display_version = capture(Field::DisplayVersion, output);

    let windows_version = os_name
        .as_deref()
        .and_then(|name| capture(Field::WindowsMajor, name))
        .map(|major| {
            let build = build_number.as_deref().and_then(|b| b.parse::<u32>().ok());
            match build {
                Some(build) if major == "10" && build >= WINDOWS_11_FIRST_BUILD => {
                    "11".to_string()
                }
                _ => major,
            }
        });

    OsVersionFacts {
        os_name,
        windows_version,
        build_number,
        display_version,
    }
}

/// Whether `AllowDevelopmentWithoutDevLicense` is set to 1.
pub fn parse_developer_mode(output: &str) -> bool {
    capture(Field::DeveloperModeFlag, output)
        .and_then(|hex| u32::from_str_radix(&hex, 16).ok())
        .is_some_and(|value| value == 1)
}
