/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Rank assignment across entities

/// Rank entities by value, highest first.
///
/// `entries` pairs each entity name with its value. Excluded entities and
/// null values receive no rank; the rest receive 1..N. Equal values are
/// ordered by entity name so the result does not depend on input order.
/// The returned ranks line up with `entries`.
pub fn assign_ranks<F>(entries: &[(&str, Option<f64>)], excluded: F) -> Vec<Option<i32>>
where
  F: Fn(&str) -> bool,
{
  let mut ranked: Vec<(usize, f64)> = entries
    .iter()
    .enumerate()
    .filter(|(_, (name, _))| !excluded(*name))
    .filter_map(|(idx, (_, value))| value.map(|v| (idx, v)))
    .collect();

  ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| entries[a.0].0.cmp(entries[b.0].0)));

  let mut ranks = vec![None; entries.len()];
  for (position, (idx, _)) in ranked.into_iter().enumerate() {
    ranks[idx] = Some(position as i32 + 1);
  }
  ranks
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn no_capital(name: &str) -> bool {
    name.eq_ignore_ascii_case("washingtondc")
  }

  #[test]
  fn test_highest_value_ranks_first() {
    let entries = [("ohio", Some(5.0)), ("texas", Some(9.0)), ("maine", Some(1.0))];
    assert_eq!(assign_ranks(&entries, no_capital), vec![Some(2), Some(1), Some(3)]);
  }

  #[test]
  fn test_ties_break_on_name() {
    let entries = [("b", Some(10.0)), ("a", Some(10.0)), ("c", Some(5.0))];
    assert_eq!(assign_ranks(&entries, no_capital), vec![Some(2), Some(1), Some(3)]);

    let reversed = [("c", Some(5.0)), ("a", Some(10.0)), ("b", Some(10.0))];
    assert_eq!(assign_ranks(&reversed, no_capital), vec![Some(3), Some(1), Some(2)]);
  }

  #[test]
  fn test_capital_and_nulls_are_unranked() {
    let entries = [
      ("WashingtonDC", Some(1000.0)),
      ("vermont", None),
      ("utah", Some(3.0)),
      ("iowa", Some(4.0)),
    ];
    assert_eq!(assign_ranks(&entries, no_capital), vec![None, None, Some(2), Some(1)]);
  }

  #[test]
  fn test_ranks_are_a_bijection_onto_one_to_n() {
    let entries: Vec<(String, Option<f64>)> =
      (0..20).map(|i| (format!("entity{:02}", i), Some(f64::from(i % 7)))).collect();
    let borrowed: Vec<(&str, Option<f64>)> =
      entries.iter().map(|(name, value)| (name.as_str(), *value)).collect();

    let mut ranks: Vec<i32> = assign_ranks(&borrowed, no_capital).into_iter().flatten().collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=20).collect::<Vec<i32>>());
  }

  #[test]
  fn test_empty_input() {
    assert!(assign_ranks(&[], no_capital).is_empty());
  }
}
