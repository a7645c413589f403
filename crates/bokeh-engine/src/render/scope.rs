/// Runs `f` inside validation and out-of-memory error scopes on `device`.
///
/// Errors raised while `f` runs come back as `Err` instead of reaching the
/// device's uncaptured-error handler, which panics by default. Scopes are
/// per thread, so `f` must not hand its work to another thread.
pub(crate) fn capture_errors<R>(
    device: &wgpu::Device,
    f: impl FnOnce() -> R,
) -> Result<R, wgpu::Error> {
    let oom = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let out = f();

    // Innermost first.
    let validation = pollster::block_on(validation.pop());
    let oom = pollster::block_on(oom.pop());

    match validation.or(oom) {
        Some(e) => Err(e),
        None => Ok(out),
    }
}
