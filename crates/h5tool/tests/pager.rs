use h5tool::pager::{DEFAULT_PAGE_SIZE, DatasetPager, PageWindow};
use h5tool::{Error, MemoryContainer, NodePath};

fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn first_page_of_small_2d_dataset_shows_everything() {
    let mut c = MemoryContainer::new();
    c.add_dataset_2d("/a/x", vec![vec![1i64, 2], vec![3, 4], vec![5, 6]]);

    let pager = DatasetPager::open(&c, &NodePath::new("/a/x"), DEFAULT_PAGE_SIZE).unwrap();
    let page = pager.current_page(&c).unwrap();

    assert_eq!(page.page, 0);
    assert_eq!(page.headers, vec!["Column 1", "Column 2"]);
    assert_eq!(page.rows, strings(&[&["1", "2"], &["3", "4"], &["5", "6"]]));
}

#[test]
fn one_dimensional_pages_slice_elements() {
    let mut c = MemoryContainer::new();
    c.add_dataset_1d("/v", (0..25i64).collect());
    let path = NodePath::new("/v");

    let mut pager = DatasetPager::open(&c, &path, 10).unwrap();
    let first = pager.current_page(&c).unwrap();
    assert_eq!(first.headers, vec!["Data (Page 1)"]);
    assert_eq!(first.rows.len(), 10);
    assert_eq!(first.rows[0], vec!["0"]);

    let second = pager.next_page(&c).unwrap();
    assert_eq!(second.headers, vec!["Data (Page 2)"]);
    assert_eq!(second.first_row, 10);
    assert_eq!(second.rows[0], vec!["10"]);

    let third = pager.next_page(&c).unwrap();
    assert_eq!(third.rows.len(), 5);
    assert_eq!(third.rows[4], vec!["24"]);
}

#[test]
fn two_dimensional_pages_slice_rows() {
    let mut c = MemoryContainer::new();
    let rows: Vec<Vec<i64>> = (0..5).map(|r| vec![r * 10, r * 10 + 1, r * 10 + 2]).collect();
    c.add_dataset_2d("/m", rows);

    let mut pager = DatasetPager::open(&c, &NodePath::new("/m"), 2).unwrap();
    pager.next_page(&c).unwrap();
    let page = pager.next_page(&c).unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.headers.len(), 3);
    assert_eq!(page.rows, strings(&[&["40", "41", "42"]]));
}

#[test]
fn paging_past_the_end_renders_empty_pages() {
    let mut c = MemoryContainer::new();
    c.add_dataset_1d("/v", vec![1.5f64, 2.5]);

    let mut pager = DatasetPager::open(&c, &NodePath::new("/v"), 2).unwrap();
    let page = pager.next_page(&c).unwrap();
    assert!(page.is_empty());
    // Still no bound: keep going.
    let page = pager.next_page(&c).unwrap();
    assert!(page.is_empty());
    assert_eq!(pager.window().page, 2);

    assert!(pager.display_page(&c, 1000).unwrap().is_empty());
}

#[test]
fn empty_dataset_has_an_empty_first_page() {
    let mut c = MemoryContainer::new();
    c.add_dataset_1d::<i64>("/empty", Vec::new());

    let pager = DatasetPager::open(&c, &NodePath::new("/empty"), 10).unwrap();
    assert!(pager.current_page(&c).unwrap().is_empty());
}

#[test]
fn higher_rank_and_scalars_are_rejected() {
    let mut c = MemoryContainer::new();
    c.add_dataset("/cube", &[2, 2, 2], (0..8i64).collect::<Vec<_>>())
        .add_dataset("/scalar", &[], vec![1i64]);

    for (path, expected) in [("/cube", 3), ("/scalar", 0)] {
        match DatasetPager::open(&c, &NodePath::new(path), 10) {
            Err(Error::UnsupportedRank { rank, .. }) => assert_eq!(rank, expected),
            other => panic!("expected rank rejection for {}, got {:?}", path, other),
        }
    }
}

#[test]
fn groups_cannot_be_paged() {
    let mut c = MemoryContainer::new();
    c.add_group("/g");
    assert!(matches!(
        DatasetPager::open(&c, &NodePath::new("/g"), 10),
        Err(Error::NotADataset(_))
    ));
}

#[test]
fn window_bounds() {
    let w = PageWindow::new(100);
    assert_eq!(w.bounds(0, 250), (0, 100));
    assert_eq!(w.bounds(2, 250), (200, 250));
    assert_eq!(w.bounds(3, 250), (300, 300));
    assert_eq!(PageWindow::new(0).page_size, 1);
}
