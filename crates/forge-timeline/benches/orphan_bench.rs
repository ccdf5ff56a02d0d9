use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use forge_timeline::orphan::{covered_shas, select_orphans};
use forge_timeline::{Author, CommitRecord, EnrichedCommit, EnrichedMergeRequest, MergeRequestRecord};

fn commit(sha: String) -> CommitRecord {
    CommitRecord {
        sha,
        message: "Benchmark commit".to_string(),
        author_name: "Bench".to_string(),
        author_email: "bench@example.com".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// `merge_requests` merge requests of 10 commits each, plus a window commit
/// list holding all of them and as many orphans again
fn setup(merge_requests: usize) -> (Vec<EnrichedMergeRequest>, Vec<CommitRecord>) {
    let mut window = Vec::new();
    let enriched = (0..merge_requests)
        .map(|iid| {
            let commits: Vec<EnrichedCommit> = (0..10)
                .map(|n| EnrichedCommit {
                    commit: commit(format!("{:040x}", iid * 10 + n)),
                    changes: vec![],
                })
                .collect();
            window.extend(commits.iter().map(|c| c.commit.clone()));
            EnrichedMergeRequest {
                merge_request: MergeRequestRecord {
                    iid: iid as u64,
                    author: Author {
                        username: "bench".to_string(),
                        name: String::new(),
                    },
                    title: format!("MR {iid}"),
                    created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                    web_url: String::new(),
                },
                commits,
                changes: vec![],
            }
        })
        .collect();

    let covered = window.len();
    window.extend((0..covered).map(|n| commit(format!("orphan-{n:034x}"))));
    (enriched, window)
}

fn orphan_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("orphans");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("classify", size),
            size,
            |b, &merge_requests| {
                let (enriched, window) = setup(merge_requests);
                b.iter(|| {
                    let covered = covered_shas(&enriched);
                    select_orphans(window.clone(), &covered)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, orphan_benchmarks);
criterion_main!(benches);
