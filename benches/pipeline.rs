use agentcheck::{
    validate_document, validate_documents, FragmentRegistry, ModelRules, RawDocument, Registry,
    ValidationOptions,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const AGENT: &str = "---\n\
name: research-assistant\n\
description: Answers questions using web search\n\
model: openai/gpt-4o\n\
tools:\n  - web_search\n  - file_reader\n  - web_serch\n\
mcp_servers:\n  - filesystem\n  - name: github\n    args: [--read-only]\n\
temperature: 0.2\n\
---\n\
You are a research assistant.\n\
{% include \"shared/tone\" %}\n\
{% include \"shared/safty\" %}\n";

fn registry() -> Registry {
    Registry::new(
        (0..200).map(|i| format!("capability_{}", i)).chain(["web_search".to_string(), "file_reader".to_string()]),
        ["filesystem", "github"],
        ModelRules::new(["openai/gpt-4o", "openai/gpt-4o-mini"], ["openai"]),
    )
}

fn bench_single_document(c: &mut Criterion) {
    let registry = registry();
    let fragments = FragmentRegistry::new(["shared/tone", "shared/safety"]);
    let options = ValidationOptions::default();
    let document = RawDocument::new("agents/research.md", AGENT);

    c.bench_function("validate_document", |b| {
        b.iter(|| validate_document(black_box(&document), &registry, &fragments, &options))
    });
}

fn bench_batch(c: &mut Criterion) {
    let registry = registry();
    let fragments = FragmentRegistry::new(["shared/tone", "shared/safety"]);
    let options = ValidationOptions::default();
    let documents: Vec<RawDocument> = (0..64)
        .map(|i| RawDocument::new(format!("agents/{}.md", i), AGENT))
        .collect();

    c.bench_function("validate_documents_64x4", |b| {
        b.iter(|| validate_documents(black_box(&documents), &registry, &fragments, &options, 4))
    });
}

criterion_group!(benches, bench_single_document, bench_batch);
criterion_main!(benches);
