// Example: minimal usage and the scroll-to helper.
use virtual_table::{TableOptions, TableVirtualizer};

fn main() {
    let mut v = TableVirtualizer::new(TableOptions::new(1_000_000));
    v.set_viewport_height(600);
    v.apply_scroll_event(123_456, 0);

    println!("total_size={}", v.total_size());
    println!("visible={:?}", v.visible_rows());
    println!("render={:?}", v.render_rows());

    v.for_each_render_row(|slot| {
        if slot.index % 5 == 0 {
            println!("row {} at top={}", slot.index, slot.top);
        }
    });

    let target = v.scroll_to_row_offset(999_999);
    println!("scroll_to_row target={target}");
    v.set_scroll_top_clamped(target);
    println!("after clamp: offset={}", v.scroll_offset());
}
