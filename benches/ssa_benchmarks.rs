//! Benchmarks for the SSA transform over synthetic CFGs.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ssa_core::arch::GenericArch;
use ssa_core::cfg::{AssignBlock, Assignment, BlockId, Cfg, IrBlock, Terminator};
use ssa_core::expr::{Expr, Variable};
use ssa_core::ssa::SsaDriver;

/// A chain of `n` diamonds: block `4k` branches into `4k+1`/`4k+2`, both of
/// which write every variable in the pool before joining at `4k+3`, which
/// becomes the next diamond's head.
fn diamond_chain(diamonds: usize, vars: usize) -> Cfg {
    let mut cfg = Cfg::new();
    let pool: Vec<Variable> = (0..vars).map(|i| Variable::new(format!("v{i}"), 32)).collect();

    for k in 0..diamonds {
        let base = k * 4;
        let (head, left, right, join) = (base, base + 1, base + 2, base + 3);
        let next_head = if k + 1 < diamonds { BlockId(base + 4) } else { BlockId(join) };

        cfg.add_block(IrBlock::new(
            BlockId(head),
            vec![AssignBlock::new()],
            Terminator::Branch {
                if_true: BlockId(left),
                if_false: BlockId(right),
            },
        ));
        for (block_id, value) in [(left, 1), (right, 2)] {
            let assigns = pool
                .iter()
                .map(|v| Assignment::new(Expr::ident(v.clone()), Expr::constant(value, 32)));
            cfg.add_block(IrBlock::new(
                BlockId(block_id),
                vec![AssignBlock::from_assignments(assigns)],
                Terminator::Jump(BlockId(join)),
            ));
        }
        let terminator = if k + 1 < diamonds {
            Terminator::Jump(next_head)
        } else {
            Terminator::Return
        };
        cfg.add_block(IrBlock::new(BlockId(join), vec![AssignBlock::new()], terminator));
    }

    cfg
}

fn bench_transform(c: &mut Criterion) {
    let arch = GenericArch::new(vec![Variable::new("pc", 32)], Variable::new("IRDst", 32));
    let mut group = c.benchmark_group("ssa_transform");

    for diamonds in [1usize, 8, 32] {
        let cfg = diamond_chain(diamonds, 8);
        group.throughput(Throughput::Elements((diamonds * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(diamonds), &cfg, |b, cfg| {
            b.iter(|| {
                let mut driver = SsaDriver::new(cfg, &arch);
                driver.transform(BlockId(0)).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
