/// NGrams produces every contiguous `size`-character window of a string.
///
/// Windows are cut on char boundaries, so multi-byte text is never split
/// inside a code point.

#[derive(Clone, Debug)]
pub struct NGrams<'a> {
    data: &'a str,
    size: usize,
}

impl<'a> NGrams<'a> {

    pub fn new(data: &'a str, size: usize) -> Self {
        assert!(size > 0, "n-gram size must be positive");
        NGrams {
            data: data,
            size: size,
        }
    }
}

impl<'a> Iterator for NGrams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pos_next: usize = 0;
        let mut pos_end: usize = 0;
        let mut chars = 0;

        // get window end and the start of the next window at once
        for (i, _) in self.data.char_indices() {
            if chars == 1 {
                pos_next = i;
            }
            if chars == self.size {
                pos_end = i;
            }
            if pos_next != 0 && pos_end != 0 {
                break;
            }
            chars += 1;
        }

        let ret = if pos_end != 0 {
            Some(&self.data[0..pos_end])
        } else if chars == self.size {
            Some(self.data)
        } else {
            None
        };

        // move to the next char, or exhaust when this was the last window
        if ret.is_some() && pos_next != 0 && pos_end != 0 {
            self.data = &self.data[pos_next..];
        } else {
            self.data = &self.data[self.data.len()..];
        }

        ret
    }
}

pub trait AsNGrams<'a> {
    fn as_ngrams(&'a self, size: usize) -> NGrams<'a>;
}

impl<'a> AsNGrams<'a> for str {
    fn as_ngrams(&'a self, size: usize) -> NGrams<'a> {
        NGrams::new(self, size)
    }
}
