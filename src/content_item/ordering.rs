use super::ContentItemInfo;
use crate::error::{CpError, CpResult};
use crate::form::FormStore;
use std::collections::{HashSet, VecDeque};

/// Order items so that every parent comes before the children that point to
/// it through `parent_item_uid`.
///
/// Unsaved children only know their parent's uid, so the parent has to be
/// stored first. Items whose parent never shows up are reported as an error.
pub fn save_order(items: &[ContentItemInfo], form: &impl FormStore) -> CpResult<Vec<ContentItemInfo>> {
    let mut queue: VecDeque<(ContentItemInfo, Option<String>, Option<String>)> = items
        .iter()
        .map(|item| (item.clone(), item.uid(form), item.parent_item_uid(form)))
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(queue.len());
    let mut loops = 0;

    while let Some((item, uid, parent_uid)) = queue.pop_front() {
        // Every remaining item was requeued once without progress.
        loops += 1;
        if loops > queue.len() + 1 {
            let mut stuck = vec![describe(&item, form, uid.as_deref(), parent_uid.as_deref())];
            stuck.extend(
                queue
                    .iter()
                    .map(|(i, u, p)| describe(i, form, u.as_deref(), p.as_deref())),
            );
            return Err(CpError::UnresolvedParents(stuck));
        }

        let ready = match parent_uid.as_deref() {
            None => true,
            Some(p) => seen.contains(p),
        };

        if ready {
            if let Some(uid) = uid {
                seen.insert(uid);
            }
            result.push(item);
            loops = 0;
        } else {
            queue.push_back((item, uid, parent_uid));
        }
    }

    Ok(result)
}

fn describe(
    item: &ContentItemInfo,
    form: &impl FormStore,
    uid: Option<&str>,
    parent_uid: Option<&str>,
) -> String {
    let id = item
        .id(form)
        .map(|id| id.to_string())
        .unwrap_or_else(|| "None".to_string());
    format!(
        "<ContentItem {} (uid {}) -> parent {}>",
        id,
        uid.unwrap_or("None"),
        parent_uid.unwrap_or("None")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_item::tests::metadata;
    use crate::form::{MemoryForm, RowHandle};

    fn info(form: &MemoryForm, handle: &RowHandle) -> ContentItemInfo {
        let row = form.row(handle).expect("row");
        ContentItemInfo::new(&row, &metadata()).expect("info")
    }

    #[test]
    fn test_parents_are_moved_before_children() {
        let meta = metadata();
        let mut form = MemoryForm::new();
        let child = form.add_content_row(&meta, 0, "textitem");
        let parent = form.add_content_row(&meta, 1, "textitem");
        let plain = form.add_content_row(&meta, 2, "textitem");
        form.insert_value("id_contentitems-0-item_uid", "child");
        form.insert_value("id_contentitems-0-parent_item_uid", "parent");
        form.insert_value("id_contentitems-1-item_uid", "parent");

        let items = vec![info(&form, &child), info(&form, &parent), info(&form, &plain)];
        let ordered = save_order(&items, &form).expect("should order");
        let order: Vec<usize> = ordered.iter().map(|i| i.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_missing_parent_is_reported() {
        let meta = metadata();
        let mut form = MemoryForm::new();
        let orphan = form.add_content_row(&meta, 0, "textitem");
        form.insert_value("id_contentitems-0-item_uid", "a");
        form.insert_value("id_contentitems-0-parent_item_uid", "gone");

        let err = save_order(&[info(&form, &orphan)], &form).unwrap_err();
        match err {
            CpError::UnresolvedParents(stuck) => {
                assert_eq!(stuck, vec!["<ContentItem None (uid a) -> parent gone>".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let form = MemoryForm::new();
        assert!(save_order(&[], &form).expect("empty").is_empty());
    }
}
