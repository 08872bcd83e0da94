use cvpager::paginate::paginate;

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn height(&mut self, capacity: f32) -> f32 {
        // Mostly small chunks, now and then one taller than a page.
        match self.next() % 10 {
            0 => capacity * 1.5,
            1 => 0.0,
            _ => (self.next() % 400) as f32 + 0.5,
        }
    }
}

fn sequences() -> Vec<(Vec<f32>, f32)> {
    let mut rng = Lcg(0x5eed);
    (0..200)
        .map(|i| {
            let capacity = 200.0 + (i % 7) as f32 * 150.0;
            let len = (rng.next() % 40) as usize;
            let heights = (0..len).map(|_| rng.height(capacity)).collect();
            (heights, capacity)
        })
        .collect()
}

#[test]
fn scenario_from_page_budget() {
    let partition = paginate(&[100.0, 200.0, 150.0, 400.0, 50.0], 300.0);
    assert_eq!(
        partition.to_index_lists(),
        vec![vec![0, 1], vec![2], vec![3], vec![4]]
    );
    assert_eq!(partition.page_of(2), Some(1));
    assert_eq!(partition.page_of(5), None);
}

#[test]
fn empty_sequence_has_no_pages() {
    let partition = paginate(&[], 300.0);
    assert!(partition.is_empty());
    assert_eq!(partition.len(), 0);
}

#[test]
fn exact_fit_stays_on_page() {
    let partition = paginate(&[150.0, 150.0], 300.0);
    assert_eq!(partition.to_index_lists(), vec![vec![0, 1]]);
}

#[test]
fn any_overflow_moves_chunk_to_next_page() {
    let partition = paginate(&[150.0, 150.005], 300.0);
    assert_eq!(partition.to_index_lists(), vec![vec![0], vec![1]]);
    let partition = paginate(&[100.0, 100.0, 100.0, 0.001], 300.0);
    assert_eq!(partition.to_index_lists(), vec![vec![0, 1, 2], vec![3]]);
}

#[test]
fn oversized_chunk_gets_its_own_page() {
    assert_eq!(paginate(&[500.0], 300.0).to_index_lists(), vec![vec![0]]);
    assert_eq!(
        paginate(&[100.0, 500.0, 100.0], 300.0).to_index_lists(),
        vec![vec![0], vec![1], vec![2]]
    );
}

#[test]
fn invalid_heights_count_as_zero() {
    let partition = paginate(&[f32::NAN, -5.0, 100.0], 100.0);
    assert_eq!(partition.to_index_lists(), vec![vec![0, 1, 2]]);
}

#[test]
fn partition_covers_every_chunk_once_in_order() {
    for (heights, capacity) in sequences() {
        let partition = paginate(&heights, capacity);
        let flat: Vec<usize> = partition.to_index_lists().into_iter().flatten().collect();
        assert_eq!(flat, (0..heights.len()).collect::<Vec<_>>());
        assert!(partition.pages().iter().all(|r| !r.is_empty()));
    }
}

#[test]
fn pages_respect_capacity_unless_single_chunk() {
    for (heights, capacity) in sequences() {
        for range in paginate(&heights, capacity).pages() {
            let used: f32 = heights[range.clone()].iter().sum();
            assert!(
                range.len() == 1 || used <= capacity,
                "page {range:?} uses {used} of {capacity}"
            );
        }
    }
}

#[test]
fn pages_are_filled_greedily() {
    for (heights, capacity) in sequences() {
        let partition = paginate(&heights, capacity);
        let pages = partition.pages();
        for pair in pages.windows(2) {
            let used: f32 = heights[pair[0].clone()].iter().sum();
            let next = heights[pair[1].start];
            assert!(
                used + next > capacity,
                "chunk {} would have fit after {:?}",
                pair[1].start,
                pair[0]
            );
        }
    }
}

#[test]
fn paginate_is_deterministic() {
    for (heights, capacity) in sequences() {
        assert_eq!(paginate(&heights, capacity), paginate(&heights, capacity));
    }
}
