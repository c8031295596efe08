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

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for long loops, or `None` when progress output is off
pub fn progress_bar(len: u64, enabled: bool) -> Option<ProgressBar> {
  if !enabled {
    return None;
  }

  let pb = ProgressBar::new(len);
  pb.set_style(
    ProgressStyle::default_bar()
      .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
      .unwrap_or_else(|_| ProgressStyle::default_bar())
      .progress_chars("#>-"),
  );
  Some(pb)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_disabled_progress_bar() {
    assert!(progress_bar(10, false).is_none());
  }

  #[test]
  fn test_enabled_progress_bar_length() {
    let pb = progress_bar(10, true).unwrap();
    assert_eq!(pb.length(), Some(10));
  }
}
