//! Efficiency cleanup (§4.8): unlike semantic cleanup, this pass is
//! about reducing the number of edit *operations* a renderer or patch
//! applier has to process, even at the cost of a slightly less minimal
//! script. An equality shorter than `diff_edit_cost` wedged between
//! edits on both sides usually isn't worth keeping as its own segment.

use crate::{
    cleanup::merge::cleanup_merge,
    config::DiffConfig,
    diff::{Diff, Diffs, Op},
};

pub fn cleanup_efficiency(diffs: &mut Diffs, config: &DiffConfig) {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;

    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;

    let mut pointer: isize = 0;
    while (pointer as usize) < diffs.len() {
        let index = pointer as usize;
        if diffs[index].op == Op::Equal {
            if diffs[index].len() < config.diff_edit_cost as usize && (post_ins || post_del) {
                equalities.push(index);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[index].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[index].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            let triggers = last_equality.is_some()
                && ((pre_ins && pre_del && post_ins && post_del)
                    || {
                        let equality_len =
                            last_equality.as_ref().map_or(0, |s| s.chars().count());
                        equality_len * 2 < config.diff_edit_cost as usize
                            && [pre_ins, pre_del, post_ins, post_del].iter().filter(|b| **b).count() == 3
                    });

            if triggers {
                let equality = last_equality.take().expect("triggers implies Some");
                let split_at = *equalities.last().expect("triggers implies a pushed index");
                diffs.insert(split_at, Diff::delete(equality));
                diffs[split_at + 1].op = Op::Insert;

                equalities.pop();

                if pre_ins && pre_del {
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                } else {
                    equalities.pop();
                    pointer = equalities.last().map_or(-1, |&i| i as isize);
                    post_ins = false;
                    post_del = false;
                }
                changed = true;
            }
        }
        pointer += 1;
    }

    if changed {
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(op: Op, text: &str) -> Diff { Diff::new(op, text) }

    fn run(mut diffs: Diffs, edit_cost: i32) -> Diffs {
        let config = DiffConfig { diff_edit_cost: edit_cost, ..DiffConfig::default() };
        cleanup_efficiency(&mut diffs, &config);
        diffs
    }

    #[test]
    fn test_null_case() {
        assert_eq!(run(vec![], 4), vec![]);
    }

    #[test]
    fn test_no_optimization() {
        let diffs = vec![
            d(Op::Delete, "ab"),
            d(Op::Insert, "12"),
            d(Op::Equal, "wxyz"),
            d(Op::Delete, "cd"),
            d(Op::Insert, "34"),
        ];
        assert_eq!(run(diffs.clone(), 4), diffs);
    }

    #[test]
    fn test_four_edit_wedge() {
        let diffs = vec![
            d(Op::Delete, "ab"),
            d(Op::Insert, "12"),
            d(Op::Equal, "wxyz"),
            d(Op::Delete, "cd"),
            d(Op::Insert, "34"),
        ];
        assert_eq!(
            run(diffs, 5),
            vec![d(Op::Delete, "abwxyzcd"), d(Op::Insert, "12wxyz34")]
        );
    }

    #[test]
    fn test_three_edit_wedge() {
        let diffs = vec![
            d(Op::Insert, "12"),
            d(Op::Equal, "x"),
            d(Op::Delete, "cd"),
            d(Op::Insert, "34"),
        ];
        assert_eq!(
            run(diffs, 4),
            vec![d(Op::Delete, "xcd"), d(Op::Insert, "12x34")]
        );
    }

    #[test]
    fn test_backpass_elimination() {
        let diffs = vec![
            d(Op::Delete, "ab"),
            d(Op::Insert, "12"),
            d(Op::Equal, "xyz"),
            d(Op::Insert, "34"),
            d(Op::Equal, "wxyz"),
            d(Op::Insert, "56"),
        ];
        assert_eq!(
            run(diffs, 4),
            vec![d(Op::Delete, "abxyzwxyz"), d(Op::Insert, "12xyz34wxyz56")]
        );
    }

    #[test]
    fn test_high_cost_elimination() {
        let diffs = vec![
            d(Op::Delete, "ab"),
            d(Op::Insert, "12"),
            d(Op::Equal, "wxyz"),
            d(Op::Delete, "cd"),
            d(Op::Insert, "34"),
        ];
        assert_eq!(
            run(diffs, 0),
            vec![
                d(Op::Delete, "ab"),
                d(Op::Insert, "12"),
                d(Op::Equal, "wxyz"),
                d(Op::Delete, "cd"),
                d(Op::Insert, "34"),
            ]
        );
    }
}
