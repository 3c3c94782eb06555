//! Local host name lookup.

use anyhow::Result;

/// The machine's host name, used as the monitoring host identifier when
/// `--host-name` is not given.
#[cfg(unix)]
pub fn host_name() -> Result<String> {
    use anyhow::bail;

    let mut buf = [0u8; 256];

    // SAFETY: gethostname is a standard POSIX call; the buffer outlives
    // the call and the result is NUL-terminated below even on truncation.
    #[allow(unsafe_code)]
    let result = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if result != 0 {
        bail!("Failed to determine the host name");
    }
    buf[buf.len() - 1] = 0;

    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[cfg(not(unix))]
pub fn host_name() -> Result<String> {
    use anyhow::Context;

    std::env::var("COMPUTERNAME").context("Failed to determine the host name")
}
