//! Benchmark for record packing.
//!
//! TARGET: 100,000 BONE_DGS records packed well inside one frame (< 1ms)
//!
//! Run with: cargo bench --package shaderbuf_layout --bench pack_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shaderbuf_layout::{
    AnimationState, BoneDgs, BonePose, GpuRecord, LayoutSchema, SchemaRevision, SpriteDps,
    SpriteModifier, TextureChannels, Vec3, WordView,
};

const BONES: usize = 100_000;

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn create_poses(schema: &LayoutSchema) -> Vec<BonePose> {
    (0..BONES)
        .map(|i| BonePose {
            pos: Vec3::new(i as f32, 0.0, -(i as f32)),
            rot: Vec3::new(0.0, (i % 360) as f32, 0.0),
            size: Vec3::ONE,
            lerp: 0.5,
            tc: TextureChannels::from_lanes([1, 2, 3, 4], schema.revision),
            animation: AnimationState {
                frame_time: (i % 1000) as f32 * 0.25,
                frame_count: 16,
                frame_offset: (i % 16) as u8,
                sprite_index: (i % 4096) as u32,
            },
            reserved: 0,
        })
        .collect()
}

fn benchmark_single_bone(c: &mut Criterion) {
    let schema = LayoutSchema::default();
    let pose = create_poses(&schema)[7];

    c.bench_function("bone_encode", |b| {
        b.iter(|| black_box(BoneDgs::encode(black_box(&pose), &schema)));
    });

    let record = BoneDgs::encode(&pose, &schema);
    c.bench_function("bone_decode", |b| {
        b.iter(|| black_box(record.as_ref().map(|r| r.decode(black_box(&schema)))));
    });
}

fn benchmark_bone_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("bone_frame");
    group.throughput(Throughput::Elements(BONES as u64));

    for view in [WordView::ByteFields, WordView::RawBits] {
        let schema = LayoutSchema::new(SchemaRevision::A, view);
        let poses = create_poses(&schema);
        let mut out = Vec::with_capacity(BONES);

        group.bench_function(format!("{view:?}"), |b| {
            b.iter(|| {
                out.clear();
                for pose in &poses {
                    if let Ok(record) = BoneDgs::encode(pose, &schema) {
                        out.push(record);
                    }
                }
                black_box(bytemuck::cast_slice::<BoneDgs, u8>(&out).len())
            });
        });
    }

    group.finish();
}

fn benchmark_sprites(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_encode");

    for revision in SchemaRevision::ALL {
        let schema = LayoutSchema::new(revision, WordView::ByteFields);
        let modifier = SpriteModifier::neutral(revision);
        group.bench_function(revision.to_string(), |b| {
            b.iter(|| black_box(SpriteDps::encode(black_box(&modifier), &schema)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_bone, benchmark_bone_frame, benchmark_sprites);
criterion_main!(benches);
