use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arnika_editor::{align, Alignment, ElementRect, History};
use arnika_model::{template, Element, ElementStyles, ElementType, Slide, Template};

fn large_project() -> arnika_model::Project {
    let mut project = template(Template::Pitch);
    for i in 0..60 {
        let elements = (0..20)
            .map(|j| {
                Element::new(format!("el-{}-{}", i, j), ElementType::Text, "Body copy")
                    .with_styles(ElementStyles::position(format!("{}%", j), format!("{}%", i % 90)))
            })
            .collect();
        project.slides.push(std::sync::Arc::new(
            Slide::new(format!("slide-{}", i), "Generated", arnika_model::LayoutType::Grid)
                .with_elements(elements),
        ));
    }
    project
}

fn history_push(c: &mut Criterion) {
    let project = large_project();

    c.bench_function("history_push_capacity", |b| {
        b.iter(|| {
            let mut history = History::new();
            for i in 0..100 {
                let next = arnika_editor::store::update_slide_title(
                    &project,
                    "s1",
                    &format!("Title {}", i),
                );
                history.push(next, "Rename Slide");
            }
            black_box(history.len())
        })
    });
}

fn alignment(c: &mut Criterion) {
    let rects: Vec<ElementRect> = (0..200)
        .map(|i| ElementRect {
            id: format!("el-{}", i),
            left: (i % 80) as f64,
            top: (i % 50) as f64,
            width: 10.0 + (i % 7) as f64,
        })
        .collect();

    let mut group = c.benchmark_group("align");
    for alignment in Alignment::ALL {
        group.bench_function(alignment.name(), |b| {
            b.iter(|| align(black_box(&rects), alignment))
        });
    }
    group.finish();
}

criterion_group!(benches, history_push, alignment);
criterion_main!(benches);
