//! Batch Builder Integration Tests
//!
//! Boundary placement, order preservation and determinism of batch construction.

use repo_analyzer::services::{build_batches, render_file_block};
use repo_analyzer::FileEntry;

fn entries(sizes: &[usize]) -> Vec<FileEntry> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, size)| FileEntry::new(format!("src/f{i}.txt"), "a".repeat(*size)))
        .collect()
}

fn block_len(entry: &FileEntry) -> usize {
    render_file_block(entry).chars().count()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_three_4000_char_files_budget_10000() {
    let files: Vec<FileEntry> = (1..=3)
        .map(|i| FileEntry::new(format!("f{i}.txt"), "x".repeat(4000)))
        .collect();

    // "File: `f1.txt`\n```\n" + content + "\n```\n"
    assert_eq!(block_len(&files[0]), 4024);

    let batches = build_batches(files, "Analyze", 10_000);
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].files, vec!["f1.txt", "f2.txt"]);
    assert_eq!(batches[0].content_chars, 8048);
    assert_eq!(batches[1].files, vec!["f3.txt"]);
    assert_eq!(batches[1].index, 2);
}

#[test]
fn test_exact_fit_stays_in_one_batch() {
    let files = entries(&[100, 100]);
    let total: usize = files.iter().map(block_len).sum();

    assert_eq!(build_batches(files.clone(), "p", total).len(), 1);
    assert_eq!(build_batches(files, "p", total - 1).len(), 2);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_concatenated_files_reproduce_input_order() {
    let sizes = [10, 900, 35, 2500, 1, 400, 400, 400, 7000, 12, 60];
    let files = entries(&sizes);
    let expected: Vec<String> = files.iter().map(|f| f.path.clone()).collect();

    for budget in [50, 500, 1000, 3000, 100_000] {
        let batches = build_batches(files.clone(), "p", budget);
        let flattened: Vec<String> = batches.iter().flat_map(|b| b.files.clone()).collect();
        assert_eq!(flattened, expected, "budget {budget}");
    }
}

#[test]
fn test_blocks_within_budget_unless_single_oversized_file() {
    let sizes = [10, 900, 35, 2500, 1, 400, 400, 400, 7000, 12, 60];
    let budget = 1000;
    let batches = build_batches(entries(&sizes), "p", budget);

    for batch in &batches {
        if batch.content_chars > budget {
            assert_eq!(batch.file_count(), 1, "batch {} over budget", batch.index);
        }
    }
    let indices: Vec<usize> = batches.iter().map(|b| b.index).collect();
    assert_eq!(indices, (1..=batches.len()).collect::<Vec<_>>());
}

#[test]
fn test_prompt_contains_base_and_every_block() {
    let files = entries(&[20, 30]);
    let batches = build_batches(files.clone(), "Base prompt", 10_000);
    assert_eq!(batches.len(), 1);

    let prompt = &batches[0].prompt;
    assert!(prompt.starts_with("Base prompt\n"));
    for file in &files {
        assert!(prompt.contains(&render_file_block(file)));
    }
}

#[test]
fn test_building_twice_is_deterministic() {
    let files = entries(&[300, 300, 300, 50, 900, 10]);
    let first = build_batches(files.clone(), "p", 700);
    let second = build_batches(files, "p", 700);
    assert_eq!(first, second);
}
