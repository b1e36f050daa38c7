use virtual_table::TableOptions;
use virtual_table_widget::VirtualTable;

fn main() {
    // Example: driving the widget the way a UI layer would.
    //
    // An embedding layer would:
    // - feed in the measured width and the scroll container's height
    // - forward scroll events with a timestamp
    // - call render() each frame and draw the slots it receives
    let rows: Vec<String> = (0..10_000).map(|i| format!("episode {i}")).collect();
    let mut table = VirtualTable::new(TableOptions::new(0), rows)
        .with_on_render(Some(|| println!("table ready")))
        .with_on_scroll(Some(|offset: u64| println!("parent scrolls to {offset}")));

    table.handle_measure(960);
    table.handle_window_resize(600);
    table.attach_content_body();

    let mut now_ms = 0u64;
    for offset in [0u64, 380, 3_800, 38_000] {
        now_ms += 16;
        table.handle_window_scroll(offset, now_ms);
        let n = table.render(|slot, row| {
            if slot.index % 25 == 0 {
                println!("  draw {row:?} at top={}", slot.top);
            }
        });
        println!("offset={offset} rendered={n} rows");
    }

    table.scroll_to_row(5_000);
}
