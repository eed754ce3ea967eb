use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spellkit::{Speller, SpellerHunspellDict};

const AFFIXES: &str = "\
SET UTF-8
TRY esianrtolcdugmphbyfvkwz
REP 2
REP f ph
REP shun tion

PFX A Y 1
PFX A 0 re .

PFX U Y 1
PFX U 0 un .

SFX D Y 4
SFX D 0 d e
SFX D y ied [^aeiou]y
SFX D 0 ed [^ey]
SFX D 0 ed [aeiou]y

SFX G Y 2
SFX G e ing e
SFX G 0 ing [^e]

SFX S Y 4
SFX S y ies [^aeiou]y
SFX S 0 s [aeiou]y
SFX S 0 es [sxzh]
SFX S 0 s [^sxzhy]
";

const WORDS: &str = "\
20
walk/DGS
talk/DGS
work/ADGS
play/DGS
stay/DGS
carry/DGS
marry/DGS
apply/DGS
appear/ADGS
lock/AUDGS
load/ADGS
wind/UDGS
do/AG
phone/DGS
seller/S
speller/S
angle/DGS
anoint/DGS
mention/DGS
motion/DGS
";

fn load_speller() -> impl Speller {
    match SpellerHunspellDict::new(AFFIXES, WORDS) {
        Ok(dict) => dict,
        Err(e) => panic!("{:#}", e),
    }
}

fn load(c: &mut Criterion) {
    c.bench_function("load", |b| {
        b.iter(|| SpellerHunspellDict::new(black_box(AFFIXES), black_box(WORDS)))
    });
}

fn check(c: &mut Criterion) {
    let speller = load_speller();

    c.bench_function("check_hit", |b| {
        b.iter(|| speller.spellcheck(black_box("reapplied")))
    });
    c.bench_function("check_miss", |b| {
        b.iter(|| speller.spellcheck(black_box("reaplied")))
    });
}

fn suggest(c: &mut Criterion) {
    let speller = load_speller();

    dbg!(speller.suggestions("spellerr", 9));

    c.bench_function("suggest_edit1", |b| {
        b.iter(|| speller.suggestions(black_box("spellerr"), 9))
    });
    c.bench_function("suggest_edit2", |b| {
        b.iter(|| speller.suggestions(black_box("mentoin"), 9))
    });
    // Resolved from the replacement table before any edits are tried.
    c.bench_function("suggest_rep", |b| {
        b.iter(|| speller.suggestions(black_box("fone"), 9))
    });
}

criterion_group!(benches, load, check, suggest);
criterion_main!(benches);
