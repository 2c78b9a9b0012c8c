//! Office registry values and the licensing report.

use super::{capture, matches, Field};
use crate::probe::OfficeRelease;
use crate::records::{LicenseType, OfficeRecord};

/// Update channel marker used by volume-licensed LTSC builds.
const LTSC_CHANNEL_MARKER: &str = "PerpetualVL";

/// Parse the Click-to-Run configuration key.
///
/// Returns `None` unless `ProductReleaseIds` is present. `is_ltsc` is only
/// reported when an update channel is.
pub fn parse_click_to_run(output: &str) -> Option<OfficeRecord> {
    let edition = capture(Field::OfficeReleaseIds, output)?;
    let update_channel = capture(Field::OfficeUpdateChannel, output);
    let is_ltsc = update_channel
        .as_deref()
        .map(|channel| channel.contains(LTSC_CHANNEL_MARKER));

    Some(OfficeRecord {
        installed: true,
        edition: Some(edition),
        update_channel,
        is_ltsc,
        ..Default::default()
    })
}

/// Parse an MSI-era `InstallRoot` key; the release supplies the version.
pub fn parse_install_root(output: &str, release: OfficeRelease) -> Option<OfficeRecord> {
    let path = capture(Field::OfficeInstallPath, output)?;

    Some(OfficeRecord {
        installed: true,
        path: Some(path),
        version: Some(release.year().to_string()),
        ..Default::default()
    })
}

/// Licence channel from the OSPP status report. Volume markers win.
pub fn parse_license(output: &str) -> Option<LicenseType> {
    if matches(Field::OfficeVolumeLicense, output) {
        Some(LicenseType::Volume)
    } else if matches(Field::OfficeRetailLicense, output) {
        Some(LicenseType::Retail)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLICK_TO_RUN: &str = "\r
HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Office\\ClickToRun\\Configuration\r
    Platform    REG_SZ    x64\r
    ProductReleaseIds    REG_SZ    ProPlus2021Volume\r
    UpdateChannel    REG_SZ    http://officecdn.microsoft.com/pr/5030841d-c919-4594-8d2d-84ae4f96e58e\r
    VersionToReport    REG_SZ    16.0.14332.20615\r
";

    #[test]
    fn click_to_run_edition_and_channel() {
        let record = parse_click_to_run(CLICK_TO_RUN).unwrap();
        assert!(record.installed);
        assert_eq!(record.edition.as_deref(), Some("ProPlus2021Volume"));
        assert!(record.update_channel.unwrap().starts_with("http://officecdn"));
        assert_eq!(record.is_ltsc, Some(false));
    }

    #[test]
    fn perpetual_channel_is_ltsc() {
        let output = "    ProductReleaseIds    REG_SZ    ProPlus2021Volume\r\n    UpdateChannel    REG_SZ    PerpetualVL2021\r\n";
        let record = parse_click_to_run(output).unwrap();
        assert_eq!(record.is_ltsc, Some(true));
    }

    #[test]
    fn click_to_run_without_channel() {
        let output = "    ProductReleaseIds    REG_SZ    O365ProPlusRetail\r\n";
        let record = parse_click_to_run(output).unwrap();
        assert_eq!(record.update_channel, None);
        assert_eq!(record.is_ltsc, None);
    }

    #[test]
    fn click_to_run_without_release_ids() {
        assert!(parse_click_to_run("    Platform    REG_SZ    x64\r\n").is_none());
    }

    #[test]
    fn install_root_path_and_version() {
        let output = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Office\\15.0\\Common\\InstallRoot\r\n    Path    REG_SZ    C:\\Program Files\\Microsoft Office\\Office15\\\r\n";
        let record = parse_install_root(output, OfficeRelease::Office2013).unwrap();
        assert_eq!(
            record.path.as_deref(),
            Some("C:\\Program Files\\Microsoft Office\\Office15\\")
        );
        assert_eq!(record.version.as_deref(), Some("2013"));
        assert_eq!(record.edition, None);
    }

    #[test]
    fn install_root_ignores_other_values() {
        let output = "    InstallPath    REG_SZ    C:\\Office\r\n";
        assert!(parse_install_root(output, OfficeRelease::Office2016).is_none());
    }

    #[test]
    fn license_markers() {
        let volume = "LICENSE NAME: Office 21, Office21ProPlus2021VL_KMS_Client_AE edition\nLICENSE DESCRIPTION: Office 21, VOLUME_KMSCLIENT channel\n";
        assert_eq!(parse_license(volume), Some(LicenseType::Volume));

        let retail = "LICENSE DESCRIPTION: Office 16, RETAIL channel\n";
        assert_eq!(parse_license(retail), Some(LicenseType::Retail));

        assert_eq!(parse_license("<No installed product keys detected>"), None);
    }
}
