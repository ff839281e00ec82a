//! Segmentation, selection pass and rendering benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use dyslexia_sim::dictionary::SubstitutionDictionary;
use dyslexia_sim::effects::{pulse_glyphs, swap_letter_pair};
use dyslexia_sim::render::{TextSurface, to_markup};
use dyslexia_sim::text::{CellMeasurer, FontMetrics, Segmenter};
use dyslexia_sim::unicode::letters;
use dyslexia_sim::{BlurPulseConfig, EngineConfig, Rule, Rules, Simulator};
use std::hint::black_box;
use std::time::Duration;

const PARAGRAPH: &str = "La dislessia è un disturbo specifico dell'apprendimento che \
influisce sulla capacità di leggere con precisione e fluidità. Le persone con \
dislessia possono presentare difficoltà nel riconoscere le parole. ";

fn document() -> String {
    PARAGRAPH.repeat(50)
}

fn segmentation(c: &mut Criterion) {
    let dictionary = SubstitutionDictionary::builtin();
    let font = FontMetrics::default();
    let text = document();

    c.bench_function("segment_paragraph", |b| {
        let mut measurer = CellMeasurer::default();
        b.iter(|| Segmenter::new(&dictionary, &font).segment(black_box(PARAGRAPH), &mut measurer));
    });

    c.bench_function("segment_document", |b| {
        let mut measurer = CellMeasurer::default();
        b.iter(|| Segmenter::new(&dictionary, &font).segment(black_box(&text), &mut measurer));
    });
}

fn word_transforms(c: &mut Criterion) {
    c.bench_function("swap_letter_pair", |b| {
        b.iter(|| swap_letter_pair(black_box("apprendimento"), ('a', 'e')));
    });

    let config = BlurPulseConfig::default();
    let letters = letters("comunicazione");
    c.bench_function("pulse_glyphs", |b| {
        b.iter(|| pulse_glyphs(black_box(&letters), Duration::from_millis(1700), &config));
    });
}

fn selection_passes(c: &mut Criterion) {
    let text = document();
    for rule in Rule::ALL {
        c.bench_function(&format!("enable_{rule}"), |b| {
            let mut sim = Simulator::new(EngineConfig::default())
                .expect("default config")
                .with_seed(1);
            sim.set_text(&text);
            b.iter(|| {
                sim.set_rule(rule, true);
                sim.set_rule(rule, false);
            });
        });
    }

    c.bench_function("advance_all_rules_10s", |b| {
        b.iter(|| {
            let mut sim = Simulator::new(EngineConfig::default())
                .expect("default config")
                .with_seed(2);
            sim.set_text(PARAGRAPH);
            sim.set_rules(Rules::all());
            for frame in 1..=600u64 {
                sim.advance_to(Duration::from_millis(frame * 16));
            }
            black_box(sim.registry().writes())
        });
    });
}

fn rendering(c: &mut Criterion) {
    let mut sim = Simulator::new(EngineConfig::default())
        .expect("default config")
        .with_seed(3);
    sim.set_text(&document());
    sim.set_rules(Rules::all());
    sim.advance_to(Duration::from_millis(2500));

    c.bench_function("render_markup", |b| {
        b.iter(|| to_markup(&sim.render_units()));
    });

    let surface = TextSurface::new(100);
    c.bench_function("render_surface", |b| {
        b.iter(|| surface.render(&sim.render_units()));
    });
}

criterion_group!(
    benches,
    segmentation,
    word_transforms,
    selection_passes,
    rendering
);
criterion_main!(benches);
