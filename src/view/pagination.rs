use tracing::debug;

/// One page of a list, sized to the space it has to fit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
}

impl<T> Page<'_, T> {
    /// Offset of the first item of this page in the full list.
    pub fn start(&self) -> usize {
        self.page.saturating_mul(self.per_page)
    }
}

/// Whole rows that fit once the fixed chrome is subtracted. Never below one,
/// whatever the heights are.
pub fn rows_per_page(available_height: f64, row_height: f64, reserved_height: f64) -> usize {
    if !(row_height > 0.0) {
        return 1;
    }
    let rows = ((available_height - reserved_height) / row_height).floor();
    if rows.is_nan() || rows < 1.0 {
        1
    } else {
        rows as usize
    }
}

pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

pub fn paginate<T>(
    items: &[T],
    available_height: f64,
    row_height: f64,
    reserved_height: f64,
    page: usize,
) -> Page<'_, T> {
    let per_page = rows_per_page(available_height, row_height, reserved_height);
    let total_pages = total_pages(items.len(), per_page);
    let page = page.min(total_pages - 1);

    let start = page.saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages,
        per_page,
    }
}

/// Page state of one list container.
///
/// The container height starts unmeasured (zero) and is updated by resize
/// events. The page goes back to the first one whenever the list it is shown
/// for is replaced, which callers signal by passing a new source generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    row_height: f64,
    reserved_height: f64,
    available_height: f64,
    page: usize,
    source: Option<u64>,
}

impl Paginator {
    pub fn new(row_height: f64, reserved_height: f64) -> Self {
        Self {
            row_height,
            reserved_height,
            available_height: 0.0,
            page: 0,
            source: None,
        }
    }

    #[cfg(test)]
    pub fn available_height(&self) -> f64 {
        self.available_height
    }

    pub fn set_available_height(&mut self, height: f64) {
        if self.available_height != height {
            debug!(
                "List container resized from {} to {}",
                self.available_height, height
            );
            self.available_height = height;
        }
    }

    pub fn per_page(&self) -> usize {
        rows_per_page(self.available_height, self.row_height, self.reserved_height)
    }

    #[cfg(test)]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Resets to the first page if `generation` differs from the last one seen.
    pub fn observe_source(&mut self, generation: u64) {
        if self.source != Some(generation) {
            if self.source.is_some() && self.page != 0 {
                debug!("List source changed, resetting page {} to 0", self.page);
            }
            self.source = Some(generation);
            self.page = 0;
        }
    }

    pub fn go_to(&mut self, page: usize, item_count: usize) {
        let last = total_pages(item_count, self.per_page()) - 1;
        self.page = page.min(last);
    }

    pub fn next(&mut self, item_count: usize) {
        self.go_to(self.page.saturating_add(1), item_count);
    }

    pub fn previous(&mut self, item_count: usize) {
        self.go_to(self.page.saturating_sub(1), item_count);
    }

    pub fn first(&mut self) {
        self.page = 0;
    }

    pub fn last(&mut self, item_count: usize) {
        self.go_to(usize::MAX, item_count);
    }

    /// Slice of `items` at the stored page, clamped but without storing it.
    pub fn view<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(
            items,
            self.available_height,
            self.row_height,
            self.reserved_height,
            self.page,
        )
    }

    /// Current slice of `items`, clamping the stored page first.
    pub fn current<'a, T>(&mut self, items: &'a [T]) -> Page<'a, T> {
        let page = self.view(items);
        self.page = page.page;
        page
    }
}
