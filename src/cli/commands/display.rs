//! Human-readable rendering of detected records.

use chrono::{DateTime, Utc};
use console::style;
use std::io::{self, Write};

use crate::config::format_duration;
use crate::records::{
    CategoryData, FeatureInventory, LicenseType, OfficeRecord, SoftwareInventory,
    SystemConfigRecord,
};

/// Icon for an installed / missing item.
pub fn status_icon(installed: bool) -> &'static str {
    if installed {
        "✓"
    } else {
        "✗"
    }
}

fn item(out: &mut dyn Write, installed: bool, text: &str) -> io::Result<()> {
    let icon = status_icon(installed);
    if installed {
        writeln!(out, "  {} {}", style(icon).green(), text)
    } else {
        writeln!(out, "  {} {}", style(icon).red(), style(text).dim())
    }
}

fn field(out: &mut dyn Write, label: &str, value: Option<&str>) -> io::Result<()> {
    writeln!(out, "  {:<16} {}", label, value.unwrap_or("-"))
}

fn heading(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", style(title).bold())
}

/// "fetched 2h ago" for a category timestamp.
pub fn age_label(fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match fetched_at {
        Some(at) => {
            let age = now.signed_duration_since(at).max(chrono::Duration::zero());
            format!("fetched {} ago", format_duration(age))
        }
        None => "not cached".to_string(),
    }
}

pub fn show_system(out: &mut dyn Write, record: &SystemConfigRecord) -> io::Result<()> {
    heading(out, "System")?;
    field(out, "OS", record.os_name.as_deref())?;
    field(out, "Windows", record.windows_version.as_deref())?;
    field(out, "Build", record.build_number.as_deref())?;
    field(out, "Release", record.display_version.as_deref())?;
    field(
        out,
        "Developer mode",
        Some(if record.developer_mode { "on" } else { "off" }),
    )?;

    let cpu = record
        .cpu
        .as_ref()
        .map(|cpu| format!("{} ({} threads)", cpu.name, cpu.logical_processors));
    field(out, "CPU", cpu.as_deref())?;
    let ram = record.ram.as_ref().map(|ram| format!("{:.2} GB", ram.total_gb));
    field(out, "Memory", ram.as_deref())?;

    for drive in &record.drives {
        writeln!(
            out,
            "  {:<16} {:.2} GB free of {:.2} GB",
            drive.drive, drive.free_gb, drive.size_gb
        )?;
    }
    Ok(())
}

pub fn show_features(out: &mut dyn Write, inventory: &FeatureInventory) -> io::Result<()> {
    let enabled: Vec<&str> = inventory.installed().collect();
    heading(
        out,
        &format!(
            "Windows features ({} enabled of {})",
            enabled.len(),
            inventory.len()
        ),
    )?;
    for name in enabled {
        item(out, true, name)?;
    }
    Ok(())
}

pub fn show_software(out: &mut dyn Write, inventory: &SoftwareInventory) -> io::Result<()> {
    heading(out, "Software")?;
    for (tool, record) in &inventory.0 {
        let text = match &record.version {
            Some(version) => format!("{} {}", tool, version),
            None => tool.clone(),
        };
        item(out, record.installed, &text)?;
    }
    Ok(())
}

pub fn show_office(out: &mut dyn Write, record: &OfficeRecord) -> io::Result<()> {
    heading(out, "Office")?;
    if !record.installed {
        return item(out, false, "not installed");
    }

    let product = record
        .edition
        .as_deref()
        .or(record.version.as_deref())
        .unwrap_or("installed");
    item(out, true, product)?;
    field(out, "Channel", record.update_channel.as_deref())?;
    if let Some(is_ltsc) = record.is_ltsc {
        field(out, "LTSC", Some(if is_ltsc { "yes" } else { "no" }))?;
    }
    let license = record.license_type.map(|license| match license {
        LicenseType::Volume => "volume",
        LicenseType::Retail => "retail",
    });
    field(out, "License", license)?;
    if record.path.is_some() {
        field(out, "Path", record.path.as_deref())?;
    }
    Ok(())
}

/// Render any category.
pub fn show_category(out: &mut dyn Write, data: &CategoryData) -> io::Result<()> {
    match data {
        CategoryData::System(record) => show_system(out, record),
        CategoryData::WindowsFeatures(inventory) => show_features(out, inventory),
        CategoryData::Software(inventory) => show_software(out, inventory),
        CategoryData::Office(record) => show_office(out, record),
    }
}
