use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::new(1000, 600);

    // Fill with a soft gradient so the background is not perfectly flat
    for y in 0..600 {
        for x in 0..1000 {
            let v = 180 + (x * 40 / 1000) as u8;
            let b = 180 + (y * 40 / 600) as u8;
            img.put_pixel(x, y, Rgb([v, v, b]));
        }
    }

    // A white plate with a dark frame, and a dark car body around it
    draw_filled_rect_mut(&mut img, Rect::at(250, 300).of_size(500, 200), Rgb([40, 40, 60]));
    draw_filled_rect_mut(&mut img, Rect::at(440, 380).of_size(120, 40), Rgb([245, 245, 245]));
    draw_hollow_rect_mut(&mut img, Rect::at(440, 380).of_size(120, 40), Rgb([0, 0, 0]));

    img.save("test_plate.png")?;
    println!("Created test_plate.png (1000x600, one 120x40 plate at (440, 380))");
    println!("Run: cargo run -- single test_plate.png --debug-out debug/");

    Ok(())
}
