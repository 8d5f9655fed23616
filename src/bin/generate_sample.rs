//! Writes a small synthetic corpus, dictionary, undesired-term list and
//! label lookup into a directory (default: current directory), so that
//! `lexiscore` can be tried end to end:
//!
//! ```text
//! generate_sample out/
//! lexiscore -d out/sample.dic -u out/sample_undesired.txt -i out/sample_corpus.tsv \
//!     -c 3 -o out/scored.tsv -l out/sample_labels.csv --group-a R --group-b D
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

const DICTIONARY: &str = "\
Sample moral foundations dictionary
%
1\tcare.virtue
2\tcare.vice
3\tfairness.virtue
4\tloyalty.virtue
%
care\t1
protect\t1
help\t1
hurt\t2
harm\t2
fair\t3
equal\t3
justice\t3
together\t4
community\t4
";

const UNDESIRED: &str = "RT\n&amp;\nhttps://t.co/x\n";

/// Words sampled per category, in dictionary order, plus filler words.
const CATEGORY_WORDS: [&[&str]; 4] = [
    &["care", "protect", "help"],
    &["hurt", "harm"],
    &["fair", "equal", "justice"],
    &["together", "community"],
];
const FILLER: &[&str] = &[
    "the", "state", "budget", "today", "we", "will", "our", "schools", "roads", "new", "plan",
    "for", "every", "family", "and",
];
const QUERIES: &[&str] = &["schools", "health", "budget"];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One tweet. `bias` shifts the odds of each category's words.
fn generate_tweet(rng: &mut SimpleRng, bias: &[f64; 4]) -> String {
    let length = 6 + (rng.next_u64() % 10) as usize;
    let mut words: Vec<&str> = Vec::with_capacity(length + 1);
    if rng.next_f64() < 0.2 {
        words.push("RT");
    }
    for _ in 0..length {
        let roll = rng.next_f64();
        let mut threshold = 0.0;
        let mut chosen = None;
        for (category, &p) in bias.iter().enumerate() {
            threshold += p;
            if roll < threshold {
                chosen = Some(rng.pick(CATEGORY_WORDS[category]));
                break;
            }
        }
        words.push(chosen.unwrap_or_else(|| rng.pick(FILLER)));
    }
    let mut tweet = words.join(" ");
    if rng.next_f64() < 0.1 {
        tweet.push_str(" https://t.co/x");
    }
    tweet
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Party R leans on care and loyalty words, party D on fairness words.
    let authors: Vec<(String, &str, [f64; 4])> = (1..=8)
        .map(|i| {
            let (party, bias) = if i % 2 == 0 {
                ("R", [0.15, 0.05, 0.03, 0.12])
            } else {
                ("D", [0.08, 0.05, 0.15, 0.04])
            };
            (format!("gov_{i:02}"), party, bias)
        })
        .collect();

    let corpus_path = out_dir.join("sample_corpus.tsv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(&corpus_path)
        .with_context(|| format!("creating {}", corpus_path.display()))?;
    writer.write_record(["User Name", "Query", "Tweet"])?;

    let mut tweets = 0;
    for (name, _, bias) in &authors {
        for query in QUERIES {
            let count = 2 + rng.next_u64() % 4;
            for _ in 0..count {
                let tweet = generate_tweet(&mut rng, bias);
                writer.write_record([name.as_str(), *query, tweet.as_str()])?;
                tweets += 1;
            }
        }
    }
    writer.flush()?;

    let labels: String = authors
        .iter()
        .map(|(name, party, _)| format!("{name},{party}\n"))
        .collect();

    for (file, contents) in [
        ("sample.dic", DICTIONARY),
        ("sample_undesired.txt", UNDESIRED),
        ("sample_labels.csv", labels.as_str()),
    ] {
        let path = out_dir.join(file);
        std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Wrote {tweets} tweets from {} authors to {}",
        authors.len(),
        out_dir.display()
    );
    Ok(())
}
