//! Audio device lookup.
//!
//! Devices are named in the config as "default", a numeric index from
//! `micdeck list-devices`, or an exact device name.

use super::AudioError;
use cpal::traits::{DeviceTrait, HostTrait};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Which side of the host a device is looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Resolves a device spec against the host.
///
/// # Errors
/// - If the default device is requested and none exists
/// - If the index is out of range or no device has the given name
pub fn find_device(
    host: &cpal::Host,
    direction: Direction,
    device_spec: &str,
) -> Result<cpal::Device, AudioError> {
    let spec = device_spec.trim();

    if spec.is_empty() || spec == "default" {
        return match direction {
            Direction::Input => host.default_input_device().ok_or(AudioError::NoInputDevice),
            Direction::Output => host
                .default_output_device()
                .ok_or(AudioError::NoOutputDevice),
        };
    }

    let devices: Vec<cpal::Device> = match direction {
        Direction::Input => host.input_devices()?.collect(),
        Direction::Output => host.output_devices()?.collect(),
    };

    if let Ok(index) = spec.parse::<usize>() {
        let max = devices.len().saturating_sub(1);
        return devices
            .into_iter()
            .nth(index)
            .ok_or(AudioError::DeviceIndexOutOfRange { index, max });
    }

    devices
        .into_iter()
        .find(|device| device.name().map(|name| name == spec).unwrap_or(false))
        .ok_or_else(|| AudioError::DeviceNotFound(spec.to_string()))
}

/// Runs `f` with stderr redirected to /dev/null.
///
/// ALSA prints configuration noise while cpal probes devices; none of it is
/// actionable and it corrupts the alternate screen.
#[cfg(target_os = "linux")]
pub fn quiet_stderr<F, T, E>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<std::io::Error>,
{
    let dev_null = OpenOptions::new().write(true).open("/dev/null")?;
    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(std::io::Error::last_os_error().into());
    }

    if unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) } == -1 {
        let err = std::io::Error::last_os_error();
        unsafe { libc::close(old_stderr) };
        return Err(err.into());
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// No ALSA outside Linux, so nothing to silence.
#[cfg(not(target_os = "linux"))]
pub fn quiet_stderr<F, T, E>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<std::io::Error>,
{
    f()
}
