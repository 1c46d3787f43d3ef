use eframe::egui;
use pdf_compose::PageList;

use super::Action;

/// Final position of a row dragged from `from` and dropped in the gap
/// before row `insert_before` (`len` for the end of the list)
pub fn drop_position(from: usize, insert_before: usize) -> usize {
    if insert_before > from {
        insert_before - 1
    } else {
        insert_before
    }
}

pub fn show(ui: &mut egui::Ui, list: &PageList, selected: Option<usize>, actions: &mut Vec<Action>) {
    ui.heading("Pages");
    ui.separator();

    if list.is_empty() {
        ui.label("No pages yet");
        return;
    }

    let mut dropped = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, row) in list.rows().iter().enumerate() {
            let item_id = egui::Id::new(("page_row", row.id));
            let response = ui
                .dnd_drag_source(item_id, index, |ui| {
                    ui.selectable_label(selected == Some(index), format!("{}. {}", index + 1, row.label))
                })
                .inner;

            if response.clicked() {
                actions.push(Action::Select(index));
            }

            // Upper half of a row drops above it, lower half below
            if let (Some(pointer), Some(_)) = (
                ui.input(|i| i.pointer.interact_pos()),
                response.dnd_hover_payload::<usize>(),
            ) {
                let rect = response.rect;
                let stroke = egui::Stroke::new(2.0, ui.visuals().selection.stroke.color);
                let insert_before = if pointer.y < rect.center().y {
                    ui.painter().hline(rect.x_range(), rect.top(), stroke);
                    index
                } else {
                    ui.painter().hline(rect.x_range(), rect.bottom(), stroke);
                    index + 1
                };

                if let Some(from) = response.dnd_release_payload::<usize>() {
                    dropped = Some((*from, insert_before));
                }
            }
        }
    });

    if let Some((from, insert_before)) = dropped {
        let to = drop_position(from, insert_before).min(list.len() - 1);
        if from != to {
            actions.push(Action::MoveRow { from, to });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_position() {
        // Dragging row 0 below row 2 of three
        assert_eq!(drop_position(0, 3), 2);
        // Dragging row 2 above row 0
        assert_eq!(drop_position(2, 0), 0);
        // Dropping right back into its own gap
        assert_eq!(drop_position(1, 1), 1);
        assert_eq!(drop_position(1, 2), 1);
    }
}
