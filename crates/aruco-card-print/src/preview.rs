//! On-screen preview of the composited card.

use crate::{Canvas, CardError};

#[cfg(feature = "preview")]
mod window {
    use minifb::{Key, Window, WindowOptions};

    use crate::{Canvas, CardError};

    fn pack_rgb(canvas: &Canvas) -> Vec<u32> {
        canvas
            .as_rgb()
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
            })
            .collect()
    }

    pub(super) fn show(canvas: &Canvas) -> Result<(), CardError> {
        let (w, h) = (canvas.width() as usize, canvas.height() as usize);
        let buffer = pack_rgb(canvas);
        let mut window = Window::new("aruco card - ESC to close", w, h, WindowOptions::default())
            .map_err(|e| CardError::Preview(e.to_string()))?;
        window.set_target_fps(30);
        while window.is_open() && !window.is_key_down(Key::Escape) {
            window
                .update_with_buffer(&buffer, w, h)
                .map_err(|e| CardError::Preview(e.to_string()))?;
        }
        Ok(())
    }

}

/// Show `canvas` in a window until it is closed or Escape is pressed.
#[cfg(feature = "preview")]
pub fn preview(canvas: &Canvas) -> Result<(), CardError> {
    log::info!(
        "previewing {}x{} card, close the window to continue",
        canvas.width(),
        canvas.height()
    );
    window::show(canvas)
}

/// Without the `preview` feature there is no window; this only logs.
#[cfg(not(feature = "preview"))]
pub fn preview(canvas: &Canvas) -> Result<(), CardError> {
    log::warn!(
        "preview of the {}x{} card requested but built without the `preview` feature; skipping",
        canvas.width(),
        canvas.height()
    );
    Ok(())
}
