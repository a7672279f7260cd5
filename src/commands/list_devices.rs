//! List audio input and output devices.

use crate::audio::device::quiet_stderr;
use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait};

/// Prints every input and output device with its default configuration.
///
/// The IDs printed here are what `input_device` and `output_device` accept
/// in micdeck.toml.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn handle_list_devices() -> Result<(), anyhow::Error> {
    let (host, inputs, outputs) = quiet_stderr(|| {
        let host = cpal::default_host();
        let inputs: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate input devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        let outputs: Vec<cpal::Device> = host
            .output_devices()
            .map_err(|e| anyhow!("Failed to enumerate output devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        Ok::<_, anyhow::Error>((host, inputs, outputs))
    })?;

    println!();
    println!("micdeck audio devices");
    println!();

    let default_input = host.default_input_device().and_then(|d| d.name().ok());
    print_section("Input devices", &inputs, default_input.as_deref(), |d| {
        d.default_input_config()
            .map(|c| (c.sample_rate().0, c.channels()))
            .ok()
    });

    let default_output = host.default_output_device().and_then(|d| d.name().ok());
    print_section("Output devices", &outputs, default_output.as_deref(), |d| {
        d.default_output_config()
            .map(|c| (c.sample_rate().0, c.channels()))
            .ok()
    });

    Ok(())
}

fn print_section<F>(title: &str, devices: &[cpal::Device], default_name: Option<&str>, config: F)
where
    F: Fn(&cpal::Device) -> Option<(u32, u16)>,
{
    println!("{title}:");
    println!();

    if devices.is_empty() {
        println!("  (none found)");
        println!();
        return;
    }

    for (index, device) in devices.iter().enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let default_indicator = if default_name == Some(name.as_str()) {
            " [DEFAULT]"
        } else {
            ""
        };
        let config_info = match quiet_stderr(|| Ok::<_, std::io::Error>(config(device))) {
            Ok(Some((sample_rate, channels))) => format!("{sample_rate}Hz, {channels} channels"),
            _ => "configuration unavailable".to_string(),
        };

        println!("  ID: {index}");
        println!("    Name: {name}{default_indicator}");
        println!("    Config: {config_info}");
        println!();
    }
}
