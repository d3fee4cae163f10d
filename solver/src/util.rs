use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::{
    error::{MazeError, Result},
    grid::{Cell, Grid, Overlay, Point},
};

pub const WALL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const START_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GOAL_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const PATH_COLOR: Rgba<u8> = Rgba([0, 128, 0, 255]);

/// Exact match on the three marker colors, anything else is open space
pub fn classify(pixel: Rgba<u8>) -> Cell {
    if pixel == WALL_COLOR {
        Cell::Wall
    } else if pixel == START_COLOR {
        Cell::Start
    } else if pixel == GOAL_COLOR {
        Cell::Goal
    } else {
        Cell::Open
    }
}

pub fn parse_img(img: &DynamicImage) -> Grid {
    let mut grid = Grid::new(img.width() as usize, img.height() as usize);

    for (col, row, pixel) in img.pixels() {
        grid.set(Point::new(col as isize, row as isize), classify(pixel));
    }

    grid
}

/// A decoded maze together with the pixels it came from, so the solution can
/// be drawn on top of the original image.
pub struct MazeImage {
    source: RgbaImage,
    grid: Grid,
}

impl MazeImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| MazeError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded {:?} ({}x{})", path, img.width(), img.height());

        Ok(Self::from_image(img))
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let grid = parse_img(&img);
        Self {
            source: img.to_rgba8(),
            grid,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The source pixels with every path cell painted over
    pub fn render(&self, overlay: &Overlay) -> RgbaImage {
        let mut img = self.source.clone();
        for point in overlay.marked() {
            let (x, y) = (point.x as u32, point.y as u32);
            if x < img.width() && y < img.height() {
                img.put_pixel(x, y, PATH_COLOR);
            }
        }
        img
    }
}

/// Encodes `img` to `path`. JPEG has no alpha channel and gets the pixels as RGB.
pub fn save_image(img: RgbaImage, path: impl AsRef<Path>, format: ImageFormat) -> Result<()> {
    let path = path.as_ref();
    let img = DynamicImage::ImageRgba8(img);
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    img.save_with_format(path, format)
        .map_err(|source| MazeError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("saved {:?} as {:?}", path, format);

    Ok(())
}

/// Format for `path` from its extension, PNG when there is none or it is unknown
pub fn format_for(path: impl AsRef<Path>) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Png)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::find::PathMarker;

    fn create_basic_image() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        for x in 0..4 {
            img.put_pixel(x, 0, WALL_COLOR);
        }
        img.put_pixel(0, 1, START_COLOR);
        img.put_pixel(3, 2, GOAL_COLOR);
        // close to, but not exactly, a marker color
        img.put_pixel(1, 2, Rgba([1, 0, 0, 255]));
        img.put_pixel(2, 2, Rgba([0, 0, 0, 0]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_classify_exact_colors() {
        assert_eq!(classify(WALL_COLOR), Cell::Wall);
        assert_eq!(classify(START_COLOR), Cell::Start);
        assert_eq!(classify(GOAL_COLOR), Cell::Goal);
        assert_eq!(classify(PATH_COLOR), Cell::Open);
        assert_eq!(classify(Rgba([255, 0, 0, 128])), Cell::Open);
    }

    #[test]
    fn test_parse_img() {
        let grid = parse_img(&create_basic_image());

        assert_eq!(grid.to_string(), "####\nS...\n...G\n");
    }

    #[test]
    fn test_render_paints_only_path() {
        let img = create_basic_image();
        let maze = MazeImage::from_image(img.clone());
        let mut overlay = Overlay::from_grid(maze.grid());
        overlay.mark(Point::new(1, 1));
        overlay.mark(Point::new(0, 1));
        overlay.mark(Point::new(1, 2));

        let rendered = maze.render(&overlay);
        let source = img.to_rgba8();

        for (x, y, pixel) in rendered.enumerate_pixels() {
            if (x, y) == (1, 1) || (x, y) == (1, 2) {
                assert_eq!(*pixel, PATH_COLOR);
            } else {
                assert_eq!(pixel, source.get_pixel(x, y), "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_format_for() {
        assert_eq!(format_for("out/solved.bmp"), ImageFormat::Bmp);
        assert_eq!(format_for("out/solved.png"), ImageFormat::Png);
        assert_eq!(format_for("out/solved"), ImageFormat::Png);
    }
}
