use scribble_tui::{
    editor::{Region, StyleClass, TextRange, insert_headline, wrap_selection},
    markup,
    render,
    theme::Theme,
};
use std::time::{Duration, Instant};

/// Performance benchmark suite for editor operations
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Region rendering, plain and styled
/// - Markup parsing and serialization
/// - Typing and deleting in a large region
/// - Wrapping selections and inserting headlines
const SMALL_DOC_PARAGRAPHS: usize = 10;
const MEDIUM_DOC_PARAGRAPHS: usize = 100;
const LARGE_DOC_PARAGRAPHS: usize = 1000;

const ITERATIONS: usize = 100;

const SAMPLE_WORDS: &[&str] = &[
    "Lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
];

/// Markup with the given number of paragraphs, every fifth one a headline
fn create_test_markup(num_paragraphs: usize, avg_words_per_para: usize) -> String {
    let mut out = String::new();
    for i in 0..num_paragraphs {
        let mut text = String::new();
        for j in 0..avg_words_per_para {
            if j > 0 {
                text.push(' ');
            }
            text.push_str(SAMPLE_WORDS[(i + j) % SAMPLE_WORDS.len()]);
        }
        if i % 5 == 0 {
            out.push_str(&format!("<h2>{text}</h2>"));
        } else {
            out.push_str(&format!("<p>{text}</p>"));
        }
    }
    out
}

/// Markup mixing highlight and circle spans with bold and line breaks
fn create_styled_markup(num_paragraphs: usize) -> String {
    let mut out = String::new();
    for i in 0..num_paragraphs {
        let body = format!("paragraph {i} with some marked words");
        let paragraph = if i % 3 == 0 {
            format!("<p>This is <span class=\"highlight\">{body}</span> and more.</p>")
        } else if i % 5 == 0 {
            format!("<p>Here <span class=\"circle\"><b>{body}</b></span><br>continues.</p>")
        } else {
            format!("<p>Plain {body}.</p>")
        };
        out.push_str(&paragraph);
    }
    out
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);
        println!(
            "Ops/sec:        {:.2}",
            1_000_000.0 / (self.avg_duration.as_micros().max(1)) as f64
        );

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        } else if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = *durations.iter().min().unwrap();
    let max_duration = *durations.iter().max().unwrap();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

fn sizes() -> Vec<(&'static str, usize)> {
    vec![
        ("Small (10 paras)", SMALL_DOC_PARAGRAPHS),
        ("Medium (100 paras)", MEDIUM_DOC_PARAGRAPHS),
        ("Large (1000 paras)", LARGE_DOC_PARAGRAPHS),
    ]
}

#[test]
fn bench_rendering_performance() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           RENDERING PERFORMANCE BENCHMARKS                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let theme = Theme::default();
    for (name, paragraphs) in sizes() {
        let region = Region::from_markup(&create_test_markup(paragraphs, 20));
        let caret = region.text_len() / 2;
        let result = benchmark(&format!("render_region - {name}"), ITERATIONS, || {
            let _ = render::render_region(region.nodes(), 80, None, Some(caret), &theme);
        });
        result.print();
    }
}

#[test]
fn bench_rendering_with_styles() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║        RENDERING WITH INLINE STYLES BENCHMARKS                 ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let theme = Theme::default();
    for (name, paragraphs) in sizes() {
        let region = Region::from_markup(&create_styled_markup(paragraphs));
        let len = region.text_len();
        let selection = TextRange::new(len / 4, len / 2);
        let result = benchmark(
            &format!("render_region styled + selection - {name}"),
            ITERATIONS,
            || {
                let _ = render::render_region(region.nodes(), 80, Some(selection), None, &theme);
            },
        );
        result.print();
    }
}

#[test]
fn bench_markup_round_trip() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           MARKUP PARSE / SERIALIZE BENCHMARKS                  ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    for (name, paragraphs) in sizes() {
        let source = create_styled_markup(paragraphs);
        let result = benchmark(&format!("parse - {name}"), ITERATIONS, || {
            let _ = markup::parse(&source);
        });
        result.print();

        let nodes = markup::parse(&source);
        let result = benchmark(&format!("serialize - {name}"), ITERATIONS, || {
            let _ = markup::serialize(&nodes);
        });
        result.print();
    }
}

#[test]
fn bench_typing_in_large_region() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           TYPING BENCHMARKS                                    ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let mut region = Region::from_markup(&create_test_markup(LARGE_DOC_PARAGRAPHS, 20));
    let middle = region.text_len() / 2;
    region.collapse_to(middle);

    let result = benchmark("insert_text in middle - Large", ITERATIONS, || {
        region.insert_text("x");
    });
    result.print();

    let result = benchmark("delete_backward in middle - Large", ITERATIONS, || {
        region.delete_backward();
    });
    result.print();
}

#[test]
fn bench_selection_mutations() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           SELECTION MUTATION BENCHMARKS                        ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    for (name, paragraphs) in sizes() {
        let base = Region::from_markup(&create_test_markup(paragraphs, 20));
        let len = base.text_len();

        let result = benchmark(&format!("wrap_selection - {name}"), ITERATIONS, || {
            let mut region = base.clone();
            region.select(len / 3, len / 3 + 40);
            wrap_selection(&mut region, StyleClass::Highlight);
        });
        result.print();

        let result = benchmark(&format!("insert_headline - {name}"), ITERATIONS, || {
            let mut region = base.clone();
            region.select(len / 2, len / 2 + 10);
            insert_headline(&mut region);
        });
        result.print();
    }
}
