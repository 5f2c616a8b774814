use crate::foundation::error::AvatyrResult;

/// Largest font size relative to the square dimension.
pub(crate) const MAX_FONT_RATIO: f64 = 0.8;

/// Width budget relative to the square dimension.
pub(crate) const WIDTH_BUDGET_RATIO: f64 = 0.45;

/// Smallest legible font size in pixels. The search gives up shrinking here
/// even if the text still overflows the budget.
pub(crate) const MIN_FONT_PX: u32 = 8;

/// Find the largest integer font size that fits the width budget.
///
/// `measure` reports the single-line advance width of the text at a candidate
/// font size. Candidates start at `floor(0.8 * size)` and decrease one pixel
/// at a time until the measured width is within `0.45 * size` or the minimum
/// floor is reached.
///
/// Because advance width grows with text length at any fixed size, appending
/// characters can only lower the fitted size, never raise it.
pub(crate) fn fit_font_size<M>(mut measure: M, size: u32) -> AvatyrResult<u32>
where
    M: FnMut(u32) -> AvatyrResult<f32>,
{
    let budget = f64::from(size) * WIDTH_BUDGET_RATIO;
    let mut px = ((f64::from(size) * MAX_FONT_RATIO).floor() as u32).max(MIN_FONT_PX);

    loop {
        let width = f64::from(measure(px)?);
        if width <= budget || px <= MIN_FONT_PX {
            return Ok(px);
        }
        px -= 1;
    }
}
