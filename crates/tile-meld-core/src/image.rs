use crate::tile_box::TileBox;

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

#[inline]
fn dim_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

impl GrayImageView<'_> {
    /// Copy the pixels covered by `region`, clipped to the image.
    ///
    /// Box coordinates are pixel edges: a box from `start_x` to `end_x`
    /// spans columns `start_x..end_x`.
    pub fn crop(&self, region: &TileBox) -> GrayImage {
        let w = dim_i32(self.width);
        let h = dim_i32(self.height);
        let x0 = region.start_x().clamp(0, w) as usize;
        let x1 = region.end_x().clamp(0, w) as usize;
        let y0 = region.start_y().clamp(0, h) as usize;
        let y1 = region.end_y().clamp(0, h) as usize;

        let out_w = x1.saturating_sub(x0);
        let out_h = y1.saturating_sub(y0);
        let mut data = Vec::with_capacity(out_w * out_h);
        for y in y0..y0 + out_h {
            let row = y * self.width;
            data.extend_from_slice(&self.data[row + x0..row + x0 + out_w]);
        }
        GrayImage {
            width: out_w,
            height: out_h,
            data,
        }
    }

    /// Crop `region` grown by `padding` and clamped to the image, or `None`
    /// if nothing of it is inside.
    pub fn crop_padded(&self, region: &TileBox, padding: i32) -> Option<GrayImage> {
        let padded = region.padded_within(padding, dim_i32(self.width), dim_i32(self.height))?;
        Some(self.crop(&padded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> GrayImage {
        GrayImage {
            width,
            height,
            data: (0..width * height).map(|i| (i % 256) as u8).collect(),
        }
    }

    #[test]
    fn crops_rows_in_order() {
        let img = ramp(8, 6);
        let region = TileBox::new(2, 1, 3, 2).expect("box");
        let out = img.view().crop(&region);
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.data, vec![10, 11, 12, 18, 19, 20]);
    }

    #[test]
    fn padded_crop_is_clipped() {
        let img = ramp(8, 6);
        let region = TileBox::new(6, 4, 2, 2).expect("box");
        let out = img.view().crop_padded(&region, 1).expect("inside");
        assert_eq!((out.width, out.height), (3, 3));
        assert_eq!(out.data[0], 3 * 8 + 5);

        let outside = TileBox::new(20, 20, 2, 2).expect("box");
        assert!(img.view().crop_padded(&outside, 1).is_none());
    }
}
