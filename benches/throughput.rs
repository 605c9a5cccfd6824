use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use cogquery::grammars::moderation::{Moderator, ModerationSettings};
use cogquery::Snapshot;

const MESSAGES: &[&str] = &[
    "hello there",
    "JOIN NOW https://discord.gg/abcdef",
    "free nitro for everyone",
    "```rust\nfn main() {}\n```",
    "ping <@1234> about the scam",
];

fn shared_moderator() -> Arc<Snapshot<Moderator>> {
    let mut settings = ModerationSettings::new();
    settings.add_blacklist("invites", r":has_link: /disc(or)?d\.gg/").unwrap();
    settings.add_blacklist("nitro", r#""free nitro""#).unwrap();
    settings.add_blacklist("shouting", ":all_caps:").unwrap();
    settings.add_blacklist("scam", "scam").unwrap();
    settings.add_whitelist("code", ":starts_with_code:").unwrap();
    Arc::new(Snapshot::new(settings.compile().unwrap()))
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let moderator = shared_moderator();

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let snapshot = Arc::clone(&moderator);
                        thread::spawn(move || {
                            let start = Instant::now();
                            for i in 0..per_thread {
                                let text = MESSAGES[i as usize % MESSAGES.len()];
                                let _ = snapshot.load().check(text);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
