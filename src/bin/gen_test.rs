//! Synthetic Takeout chat generator for stress testing chatmerge.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [rows] [folder] [files]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 heavy_takeout 4

use std::env;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use chatmerge::config::ColumnNames;
use chatmerge::parsing::encode_fragment;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const TEXTS: &[&str] = &[
    "こんにちは",
    "草",
    "8888888",
    "nice stream!",
    "Text with, commas, everywhere",
    "Text with \"quotes\"",
    "multi\nline\nchat",
    "🔥🔥🔥",
    "",
];

const PRICES: &[&str] = &["100", "500", "1000", "10000", "1.99"];

fn main() -> chatmerge::Result<()> {
    let args: Vec<String> = env::args().collect();

    let rows: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let folder = args.get(2).map(String::as_str).unwrap_or("heavy_takeout");
    let files: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4)
        .max(1);

    println!("🧪 Takeout Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Rows:   {}", rows);
    println!("   Folder: {}", folder);
    println!("   Files:  {}", files);
    println!();

    let start = std::time::Instant::now();
    fs::create_dir_all(folder)?;

    let mut rng = rand::thread_rng();
    let videos: Vec<String> = (0..(rows / 500).max(1))
        .map(|_| random_id(&mut rng, 11))
        .collect();

    let per_file = rows.div_ceil(files);
    let mut written = 0;
    for file in 0..files {
        let count = per_file.min(rows - written);
        let path = Path::new(folder).join(format!("chat_{file:03}.csv"));
        write_file(&path, &mut rng, &videos, written, count)?;
        written += count;
        eprint!("\r   Generated {}/{}", written, rows);
    }

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Videos: {}", videos.len());
    println!("   Time:   {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

fn write_file(
    path: &Path,
    rng: &mut impl Rng,
    videos: &[String],
    offset: usize,
    count: usize,
) -> chatmerge::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ColumnNames::default().as_array())?;

    for i in offset..offset + count {
        let video = videos.choose(rng).map_or("", String::as_str);
        let chat_id = random_id(rng, 26);
        let channel_id = format!("UC{}", random_id(rng, 22));
        let text = TEXTS.choose(rng).copied().unwrap_or_default();

        let timestamp = match i % 997 {
            0 => "not a timestamp".to_string(),
            _ => format!(
                "2024-01-01T{:02}:{:02}:{:02}.{:06}Z",
                (i / 3600) % 24,
                (i / 60) % 60,
                i % 60,
                rng.gen_range(0..1_000_000)
            ),
        };
        let price = if i % 50 == 0 {
            PRICES.choose(rng).copied().unwrap_or("100")
        } else {
            ""
        };

        // Some exports shift the video id into the text column
        let (video_field, text_field) = if i % 211 == 0 {
            (String::new(), video.to_string())
        } else {
            (video.to_string(), encode_fragment(text))
        };

        writer.write_record([
            video_field.as_str(),
            chat_id.as_str(),
            timestamp.as_str(),
            text_field.as_str(),
            channel_id.as_str(),
            price,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn random_id(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
