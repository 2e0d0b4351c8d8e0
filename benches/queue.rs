use criterion::{Criterion, black_box, criterion_group, criterion_main};
use prim_collections::{ArrayFifoQueue, ArrayPriorityQueue, HeapIndirectPriorityQueue, HeapPriorityQueue, IndirectPriorityQueue};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

fn bench_priority_queue(c: &mut Criterion) {
    let n = 10_000;
    {
        let mut group = c.benchmark_group("BinaryHeap vs HeapPriorityQueue (Enqueue/Dequeue 10k)");
        group.bench_function("std::collections::BinaryHeap<Reverse>", |b| {
            b.iter(|| {
                let mut h = BinaryHeap::new();
                for i in 0..n {
                    h.push(Reverse(black_box((i * 7919 % n) as i32)));
                }
                while let Some(v) = h.pop() {
                    black_box(v);
                }
            })
        });

        group.bench_function("HeapPriorityQueue<i32>", |b| {
            b.iter(|| {
                let mut q = HeapPriorityQueue::new();
                for i in 0..n {
                    q.enqueue(black_box((i * 7919 % n) as i32));
                }
                while let Some(v) = q.dequeue() {
                    black_box(v);
                }
            })
        });
        group.finish();
    }

    {
        let m = 16;
        let mut group = c.benchmark_group("HeapPriorityQueue vs ArrayPriorityQueue (16 elements)");
        group.bench_function("HeapPriorityQueue<i32>", |b| {
            b.iter(|| {
                let mut q = HeapPriorityQueue::new();
                for i in 0..m {
                    q.enqueue(black_box((i * 5 % m) as i32));
                }
                while let Some(v) = q.dequeue() {
                    black_box(v);
                }
            })
        });

        group.bench_function("ArrayPriorityQueue<i32>", |b| {
            b.iter(|| {
                let mut q = ArrayPriorityQueue::new();
                for i in 0..m {
                    q.enqueue(black_box((i * 5 % m) as i32));
                }
                while let Some(v) = q.dequeue() {
                    black_box(v);
                }
            })
        });
        group.finish();
    }
}

fn bench_indirect_queue(c: &mut Criterion) {
    let n = 10_000;
    let refs: Vec<u32> = (0..n).map(|i| (i * 7919 % n) as u32).collect();
    let mut group = c.benchmark_group("HeapIndirectPriorityQueue (Change keys 10k)");
    group.bench_function("HeapIndirectPriorityQueue<u32>", |b| {
        b.iter(|| {
            let mut q = HeapIndirectPriorityQueue::new(refs.clone());
            for i in 0..n {
                let _ = q.enqueue(i);
            }
            for i in (0..n).step_by(3) {
                let _ = q.set_reference(i, black_box(0));
            }
            black_box(q.dequeue())
        })
    });
    group.finish();
}

fn bench_fifo_queue(c: &mut Criterion) {
    let n = 10_000;
    let mut group = c.benchmark_group("VecDeque vs ArrayFifoQueue (Push/Pop 10k)");
    group.bench_function("std::collections::VecDeque", |b| {
        b.iter(|| {
            let mut q = VecDeque::new();
            for i in 0..n {
                q.push_back(black_box(i));
                if i % 2 == 0 {
                    black_box(q.pop_front());
                }
            }
            q
        })
    });

    group.bench_function("ArrayFifoQueue<usize>", |b| {
        b.iter(|| {
            let mut q = ArrayFifoQueue::new();
            for i in 0..n {
                q.enqueue(black_box(i));
                if i % 2 == 0 {
                    black_box(q.dequeue());
                }
            }
            q
        })
    });
    group.finish();
}

criterion_group!(benches, bench_priority_queue, bench_indirect_queue, bench_fifo_queue);
criterion_main!(benches);
