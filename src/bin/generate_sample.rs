use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const HEADER: [&str; 6] = ["Title ", " Release Year", "Genre", "Director", "IMDB Rating", "Box Office (M)"];

const MOVIES: [(&str, &str, &str); 10] = [
    ("Inception", "Sci-Fi", "Christopher Nolan"),
    ("Heat", "Crime", "Michael Mann"),
    ("Up", "Animation", "Pete Docter"),
    ("Alien", "Horror", "Ridley Scott"),
    ("Amélie", "Romance", "Jean-Pierre Jeunet"),
    ("Parasite", "Thriller", "Bong Joon-ho"),
    ("Arrival", "Sci-Fi", "Denis Villeneuve"),
    ("Spirited Away", "Animation", "Hayao Miyazaki"),
    ("Fargo", "Crime", "Joel Coen"),
    ("Whiplash", "Drama", "Damien Chazelle"),
];

const MISSING: [&str; 6] = ["", " ", "NA", "N/A", "na", "n/a"];

/// Surround with stray spaces, or replace with a missing token, now and then.
fn mess(rng: &mut SimpleRng, value: String) -> String {
    match rng.below(10) {
        0 => rng.pick(&MISSING).to_string(),
        1 => format!(" {value}"),
        2 => format!("{value}  "),
        _ => value,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for _ in 0..3 {
        for &(title, genre, director) in &MOVIES {
            let year = 1979 + rng.below(45);
            let rating = 5.0 + (rng.next_f64() * 45.0).round() / 10.0;
            let gross = (rng.next_f64() * 8000.0).round() / 10.0;
            rows.push(vec![
                mess(&mut rng, title.to_string()),
                mess(&mut rng, year.to_string()),
                mess(&mut rng, genre.to_string()),
                mess(&mut rng, director.to_string()),
                mess(&mut rng, format!("{rating:.1}")),
                mess(&mut rng, format!("{gross:.1}")),
            ]);
        }
    }

    // Exact duplicates and a blank line, scattered through the table
    for _ in 0..5 {
        let dup = rows[rng.below(rows.len())].clone();
        let at = rng.below(rows.len());
        rows.insert(at, dup);
    }
    rows.insert(rng.below(rows.len()), vec![String::new(); HEADER.len()]);

    // CSV
    let csv_path = "movies_raw.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record(HEADER)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    // Spreadsheet (everything stored as text, like a hand-typed sheet)
    let xlsx_path = "movies_raw.xlsx";
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, value)?;
            }
        }
    }
    workbook.save(xlsx_path).context("saving xlsx output")?;

    println!(
        "Wrote {} messy movie rows ({} columns) to {csv_path} and {xlsx_path}",
        rows.len(),
        HEADER.len()
    );
    Ok(())
}
