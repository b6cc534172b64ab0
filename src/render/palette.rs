/// Category colours.

use plotters::style::RGBColor;

/// Twelve distinct colours, one per calendar month. Index `i` is always the
/// colour of month `i`, across every year group and the legend.
pub const CATEGORY_COLORS: [RGBColor; 12] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(57, 59, 121),
    RGBColor(173, 73, 74),
];

pub const LINE_COLOR: RGBColor = RGBColor(0, 0, 255);
pub const AXIS_COLOR: RGBColor = RGBColor(0, 0, 0);
pub const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);
pub const OUTLINE_COLOR: RGBColor = RGBColor(63, 63, 63);

pub fn category_color(index: usize) -> RGBColor {
    CATEGORY_COLORS[index % CATEGORY_COLORS.len()]
}
