//! Dispatch Throughput Benchmarks
//!
//! Measures end-to-end cost of the runtime from `create` to `join`:
//! - self_send: one actor re-sending to itself (mailbox + requeue path)
//! - fan_out: many children spread over the pool (spawn + cross-worker path)

use cacti_actors::{ActorSystem, Message, Role};
use cacti_config::RuntimeConfig;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

const TICK: usize = 1;

/// Role that sends itself `rounds` ticks and then dies
fn countdown_role(rounds: u64) -> Role {
    Role::builder("countdown")
        .handler(|ctx, _parent| {
            ctx.send_self(Message::signal(TICK))?;
            Ok(())
        })
        .handler(move |ctx, _| {
            let seen = ctx.state_mut().get_or_insert_with(|| 0u64);
            *seen += 1;
            if *seen >= rounds {
                ctx.die()?;
            } else {
                ctx.send_self(Message::signal(TICK))?;
            }
            Ok(())
        })
        .build()
        .expect("countdown role has handlers")
}

/// Root spawns `children` countdown actors and dies
fn fan_out_role(children: usize, rounds: u64) -> Role {
    let child = Arc::new(countdown_role(rounds));
    Role::builder("fan-out")
        .handler(move |ctx, _parent| {
            for _ in 0..children {
                ctx.spawn(Arc::clone(&child))?;
            }
            ctx.die()?;
            Ok(())
        })
        .build()
        .expect("fan-out role has handlers")
}

fn run(config: RuntimeConfig, role: Role) {
    let (system, root) = ActorSystem::create_with_config(config, role).expect("system starts");
    system.join(root).expect("system joins");
    black_box(system.stats());
}

fn bench_self_send(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_send");

    for rounds in [1_000u64, 10_000] {
        group.throughput(Throughput::Elements(rounds));
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let config = RuntimeConfig::default().with_pool_size(1).with_mailbox_capacity(4);
                run(config, countdown_role(rounds));
            });
        });
    }

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    let children = 64;
    let rounds = 200u64;
    group.throughput(Throughput::Elements(children as u64 * rounds));

    for pool_size in [1usize, 2, 4] {
        group.bench_with_input(
            BenchmarkId::new("pool_size", pool_size),
            &pool_size,
            |b, &pool_size| {
                b.iter(|| {
                    let config = RuntimeConfig::default()
                        .with_pool_size(pool_size)
                        .with_mailbox_capacity(16);
                    run(config, fan_out_role(children, rounds));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_self_send, bench_fan_out);
criterion_main!(benches);
