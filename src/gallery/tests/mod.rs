use std::rc::Rc;

use anyhow::bail;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use super::*;
use crate::catalog::PhotoRecord;
use crate::layout::{PageCursor, PlacedItem, Size};


/// Renderer keeping the current grid contents and a log of every event.
#[derive(Debug, Default)]
struct RecordingRenderer {
    grid: Vec<PlacedItem>,
    viewer: Option<DisplayRequest>,
    log: Vec<String>,
    /// Thumbnails that fail to render.
    broken: Vec<Handle>,
}

impl RecordingRenderer {
    fn broken(handles: &[usize]) -> Self {
        Self {
            broken: handles.iter().copied().map(Handle).collect(),
            ..Self::default()
        }
    }

    fn grid_handles(&self) -> Vec<Handle> {
        self.grid.iter().map(|item| item.handle).collect()
    }

    fn take_log(&mut self) -> String {
        let log = self.log.join("\n");
        self.log.clear();
        log
    }
}

impl Renderer for RecordingRenderer {
    fn clear_grid(&mut self) -> anyhow::Result<()> {
        self.grid.clear();
        self.log.push(String::from("clear"));
        Ok(())
    }

    fn place(&mut self, item: &PlacedItem, photo: &PhotoRecord) -> anyhow::Result<()> {
        assert_eq!(item.handle, photo.handle);

        if self.broken.contains(&item.handle) {
            self.log.push(format!("broken {}", item.handle));
            bail!("broken image");
        }

        self.log.push(format!(
            "place {} at {},{} {}x{} src {}x{}",
            item.handle,
            item.x,
            item.y,
            item.width,
            item.height,
            item.requested_source_width,
            item.requested_source_height
        ));
        self.grid.push(*item);
        Ok(())
    }

    fn show_viewer(&mut self, request: &DisplayRequest) -> anyhow::Result<()> {
        self.log.push(format!(
            "show {} {}x{} {}",
            request.handle, request.size.w, request.size.h, request.density
        ));
        self.viewer = Some(request.clone());
        Ok(())
    }

    fn hide_viewer(&mut self) -> anyhow::Result<()> {
        self.log.push(String::from("hide"));
        self.viewer = None;
        Ok(())
    }
}

fn catalog(sizes: &[(u32, u32)]) -> Rc<Catalog> {
    Rc::new(Catalog::from_sizes(sizes))
}

fn gallery(sizes: &[(u32, u32)], width: u32, height: u32, scale: f64) -> Gallery {
    Gallery::new(
        catalog(sizes),
        Rc::new(Options::default()),
        ViewportGeometry::new(width, height, scale),
    )
}

/// Scroll metrics with the container scrolled `distance` px above its bottom.
fn scrolled_to(gallery: &Gallery, distance: f64) -> ScrollMetrics {
    let scroll_height = f64::from(gallery.content_height());
    let client_height = f64::from(gallery.geometry().height);
    ScrollMetrics {
        scroll_height,
        scroll_top: (scroll_height - client_height - distance).max(0.),
        client_height,
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    Load,
    Advance,
    Resize {
        #[proptest(strategy = "1u32..2600")]
        width: u32,
        #[proptest(strategy = "1u32..1600")]
        height: u32,
        #[proptest(strategy = "prop::sample::select(vec![1., 1.25, 1.5, 2., 3.])")]
        scale: f64,
    },
    Scroll {
        /// Distance from the bottom of the grid.
        #[proptest(strategy = "0f64..2000.")]
        distance: f64,
    },
    Select(#[proptest(strategy = "0usize..80")] usize),
    CloseViewer,
}

impl Op {
    fn apply(self, gallery: &mut Gallery, renderer: &mut RecordingRenderer) {
        match self {
            Op::Load => {
                gallery.load(renderer);
            }
            Op::Advance => {
                gallery.advance(renderer);
            }
            Op::Resize {
                width,
                height,
                scale,
            } => {
                gallery.resize(ViewportGeometry::new(width, height, scale), renderer);
            }
            Op::Scroll { distance } => {
                let metrics = scrolled_to(gallery, distance);
                gallery.scroll(metrics, renderer);
            }
            Op::Select(idx) => {
                gallery.select(Handle(idx), renderer);
            }
            Op::CloseViewer => gallery.close_viewer(renderer),
        }
    }
}

const SIZES: &[(u32, u32)] = &[
    (5000, 3333),
    (3000, 4000),
    (2500, 1667),
    (1000, 1000),
    (640, 480),
    (300, 200),
    (480, 640),
    (4000, 1000),
    (1000, 4000),
    (1920, 1080),
    (1, 1),
    (1080, 1920),
];

/// Catalog of `len` photos cycling through a mix of sizes.
fn mixed_sizes(len: usize) -> Vec<(u32, u32)> {
    SIZES.iter().copied().cycle().take(len).collect()
}

fn check_ops_on(
    gallery: &mut Gallery,
    renderer: &mut RecordingRenderer,
    ops: impl IntoIterator<Item = Op>,
) {
    for op in ops {
        op.apply(gallery, renderer);
        gallery.verify_invariants();
        check_renderer(gallery, renderer);
    }
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> (Gallery, RecordingRenderer) {
    let mut gallery = gallery(&mixed_sizes(60), 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();
    check_ops_on(&mut gallery, &mut renderer, ops);
    (gallery, renderer)
}

/// Checks that the renderer shows what the gallery thinks it shows.
fn check_renderer(gallery: &Gallery, renderer: &RecordingRenderer) {
    // Pages are placed in order, so the grid is always a prefix of the catalog.
    let placed = renderer.grid.len();
    assert_eq!(
        renderer.grid_handles(),
        (0..placed).map(Handle).collect::<Vec<_>>()
    );

    let page_len = gallery.pager().page_len();
    match gallery.pager().cursor() {
        PageCursor::Page(page) => assert_eq!(placed, page * page_len),
        PageCursor::Exhausted => assert_eq!(placed, gallery.catalog().len()),
    }

    let plan = gallery.plan();
    for item in &renderer.grid {
        assert_eq!(item.width, plan.column_width);
        assert!(item.x + item.width <= plan.horizontal_offset + plan.gallery_width());
        assert!(item.y + item.height <= gallery.content_height());
    }

    match gallery.open_photo() {
        Some(handle) => {
            let photo = gallery.catalog().get(handle).unwrap();
            let expected = gallery
                .options
                .viewer
                .display_request(photo, gallery.geometry());
            assert_eq!(renderer.viewer.as_ref(), Some(&expected));
        }
        None => assert_eq!(renderer.viewer, None),
    }
}

#[test]
fn load_places_first_page() {
    let mut gallery = gallery(&[(800, 600); 100], 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();

    // 5 columns of 190px: ceil(800 / 190) = 5 rows, 2 screens.
    assert_eq!(gallery.pager().page_len(), 50);
    assert_eq!(gallery.load(&mut renderer), 50);
    assert_eq!(gallery.pager().cursor(), PageCursor::Page(1));

    // 10 thumbnails of 142px per column.
    assert_eq!(gallery.column_heights(), [1508; 5]);
    assert_eq!(gallery.content_height(), 1508);

    gallery.verify_invariants();
    check_renderer(&gallery, &renderer);
}

#[test]
fn scroll_near_bottom_places_next_page() {
    let mut gallery = gallery(&[(800, 600); 100], 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);

    // 1px from the bottom is not close enough.
    let metrics = ScrollMetrics {
        scroll_height: 1508.,
        scroll_top: 707.,
        client_height: 800.,
    };
    assert_eq!(metrics.remaining(), 1.);
    assert_eq!(gallery.scroll(metrics, &mut renderer), 0);
    assert_eq!(renderer.grid.len(), 50);

    let metrics = ScrollMetrics {
        scroll_top: 707.5,
        ..metrics
    };
    assert_eq!(gallery.scroll(metrics, &mut renderer), 50);
    assert_eq!(renderer.grid.len(), 100);
    assert!(gallery.pager().is_exhausted());

    // Nothing left.
    let metrics = scrolled_to(&gallery, 0.);
    assert_eq!(gallery.scroll(metrics, &mut renderer), 0);
    assert_eq!(renderer.grid.len(), 100);

    check_renderer(&gallery, &renderer);
}

#[test]
fn repeated_scroll_events_place_distinct_pages() {
    let mut gallery = gallery(&mixed_sizes(200), 1000, 800, 1.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);

    // Stale metrics from before the first extra page was placed.
    let metrics = scrolled_to(&gallery, 0.);
    assert_eq!(gallery.scroll(metrics, &mut renderer), 50);
    assert_eq!(gallery.scroll(metrics, &mut renderer), 50);

    assert_eq!(renderer.grid.len(), 150);
    check_renderer(&gallery, &renderer);
}

#[test]
fn empty_catalog() {
    let mut gallery = gallery(&[], 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();

    assert!(gallery.pager().is_exhausted());
    assert_eq!(gallery.load(&mut renderer), 0);
    assert_eq!(gallery.scroll(scrolled_to(&gallery, 0.), &mut renderer), 0);
    assert_eq!(gallery.select(Handle(0), &mut renderer), None);
    assert!(renderer.log.is_empty());

    gallery.verify_invariants();
}

#[test]
fn without_pagination_everything_is_one_page() {
    let config = lightbox_config::Config::parse("test.kdl", "gallery { disable-pagination; }")
        .unwrap();
    let mut gallery = Gallery::new(
        catalog(&mixed_sizes(500)),
        Rc::new(Options::from_config(&config)),
        ViewportGeometry::new(1000, 800, 1.),
    );
    let mut renderer = RecordingRenderer::default();

    assert_eq!(gallery.load(&mut renderer), 500);
    assert!(gallery.pager().is_exhausted());
    check_renderer(&gallery, &renderer);
}

#[test]
fn height_change_keeps_layout() {
    let mut gallery = gallery(&mixed_sizes(100), 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);
    renderer.take_log();

    let heights = gallery.column_heights().to_vec();
    assert!(!gallery.resize(ViewportGeometry::new(1000, 500, 2.), &mut renderer));
    assert_eq!(gallery.column_heights(), heights);
    assert!(renderer.log.is_empty());

    // Same geometry again is a no-op too.
    assert!(!gallery.resize(ViewportGeometry::new(1000, 500, 2.), &mut renderer));
    assert!(renderer.log.is_empty());
}

#[test]
fn width_change_lays_out_from_scratch() {
    let mut gallery = gallery(&mixed_sizes(200), 1000, 800, 2.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);
    gallery.advance(&mut renderer);
    assert_eq!(renderer.grid.len(), 100);
    renderer.take_log();

    // 600px gives 3 columns of 189px: ceil(800 / 189) = 5 rows, 2 screens.
    assert!(gallery.resize(ViewportGeometry::new(600, 800, 2.), &mut renderer));
    assert_eq!(gallery.plan().column_count, 3);
    assert_eq!(gallery.pager().page_len(), 30);
    assert_eq!(gallery.pager().cursor(), PageCursor::Page(1));
    assert_eq!(renderer.grid.len(), 30);
    assert_eq!(renderer.log[0], "clear");

    gallery.verify_invariants();
    check_renderer(&gallery, &renderer);
}

#[test]
fn pixel_ratio_change_lays_out_from_scratch() {
    let mut gallery = gallery(&[(800, 600); 10], 1000, 800, 1.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);
    assert_eq!(renderer.grid[0].requested_source_width, 190);

    assert!(gallery.resize(ViewportGeometry::new(1000, 800, 2.), &mut renderer));
    assert_eq!(renderer.grid.len(), 10);
    assert_eq!(renderer.grid[0].requested_source_width, 380);
}

#[test]
fn resize_refits_open_viewer() {
    let mut gallery = gallery(&[(5000, 3333), (900, 1200)], 1280, 800, 2.);
    let mut renderer = RecordingRenderer::default();
    gallery.load(&mut renderer);

    let request = gallery.select(Handle(0), &mut renderer).unwrap();
    assert_eq!(request.size, Size::new(2560, 1706));
    assert_eq!(gallery.open_photo(), Some(Handle(0)));
    renderer.take_log();

    // Height only: the grid stays, the viewer is refit.
    gallery.resize(ViewportGeometry::new(1280, 600, 2.), &mut renderer);
    assert_eq!(renderer.take_log(), "show #0 2560x1706 SuperHD");

    gallery.resize(ViewportGeometry::new(1000, 600, 2.), &mut renderer);
    let log = renderer.take_log();
    assert!(log.starts_with("clear\n"), "{log}");
    assert!(log.ends_with("show #0 2000x1333 SuperHD"), "{log}");
    check_renderer(&gallery, &renderer);
}

#[test]
fn select_and_close() {
    let mut gallery = gallery(&[(900, 1200)], 1280, 800, 2.);
    let mut renderer = RecordingRenderer::default();

    // Closing with nothing open does nothing.
    gallery.close_viewer(&mut renderer);
    assert!(renderer.log.is_empty());

    assert_eq!(gallery.select(Handle(1), &mut renderer), None);
    assert_eq!(gallery.open_photo(), None);
    assert_eq!(gallery.summary(), None);
    assert!(renderer.log.is_empty());

    gallery.select(Handle(0), &mut renderer).unwrap();
    let summary = gallery.summary().unwrap();
    assert_eq!(summary.author.as_deref(), Some("Anonymous"));
    assert_eq!(summary.render, Size::new(450, 600));

    gallery.close_viewer(&mut renderer);
    assert_eq!(gallery.open_photo(), None);
    assert_eq!(renderer.take_log(), "show #0 450x600 SD\nhide");
}

#[test]
fn selecting_unknown_photo_keeps_open_one() {
    let mut gallery = gallery(&[(900, 1200)], 1280, 800, 2.);
    let mut renderer = RecordingRenderer::default();

    gallery.select(Handle(0), &mut renderer);
    assert_eq!(gallery.select(Handle(7), &mut renderer), None);
    assert_eq!(gallery.open_photo(), Some(Handle(0)));
}

#[test]
fn render_failure_leaves_gap() {
    let sizes = [(800, 600), (600, 800), (1000, 1000), (800, 600)];

    let mut reference = RecordingRenderer::default();
    gallery(&sizes, 600, 800, 1.).load(&mut reference);

    let mut gallery = gallery(&sizes, 600, 800, 1.);
    let mut renderer = RecordingRenderer::broken(&[1]);
    assert_eq!(gallery.load(&mut renderer), 4);

    // The broken thumbnail still took up its spot.
    assert_eq!(renderer.grid_handles(), [Handle(0), Handle(2), Handle(3)]);
    assert_eq!(renderer.grid[1], reference.grid[2]);
    assert_eq!(renderer.grid[2], reference.grid[3]);
    gallery.verify_invariants();
}

#[test]
fn ops_smoke() {
    let (gallery, renderer) = check_ops([
        Op::Load,
        Op::Scroll { distance: 0. },
        Op::Select(3),
        Op::Resize {
            width: 700,
            height: 900,
            scale: 1.5,
        },
        Op::Advance,
        Op::CloseViewer,
        Op::Resize {
            width: 1,
            height: 1,
            scale: 1.,
        },
        Op::Load,
    ]);
    assert_eq!(gallery.plan().column_count, 1);
    assert!(renderer.viewer.is_none());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: if std::env::var_os("RUN_SLOW_TESTS").is_none() {
            eprintln!("ignoring slow test");
            0
        } else {
            ProptestConfig::default().cases
        },
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_dont_panic(ops: Vec<Op>) {
        check_ops(ops);
    }
}

proptest! {
    #[test]
    fn random_operations_short(ops in proptest::collection::vec(any::<Op>(), 0..12)) {
        check_ops(ops);
    }
}
