//! Safe byte-slice conversion for vertex data uploaded to the host.

/// View a `#[repr(C)]` value as the bytes the host copies into a buffer.
///
/// # Safety
///
/// Only implement on `#[repr(C)]` types made of plain numeric fields (or
/// arrays of such types) with no padding, pointers or references.
///
/// ```rust,ignore
/// #[repr(C)]
/// struct QuadVertex {
///     uv: [f32; 2],
/// }
///
/// unsafe impl AsBytes for QuadVertex {}
///
/// device.write_buffer(buffer, 0, FULLSCREEN_QUAD.as_bytes())?;
/// ```
pub unsafe trait AsBytes: Sized {
    /// The returned slice has length `std::mem::size_of::<Self>()`.
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self as *const Self as *const u8, std::mem::size_of::<Self>())
        }
    }
}

unsafe impl<T: AsBytes, const N: usize> AsBytes for [T; N] {}
