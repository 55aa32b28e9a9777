//! The registry of templates: a chained hash table with a fixed number of
//! buckets and the DJB2 string hash.
//!
//! The table never grows. With 128 buckets lookups stay short for the few
//! hundred templates a morphology needs, but chains lengthen linearly beyond
//! that; `load_factor` and `longest_chain` make that visible.
use std::sync::Arc;

use tracing::trace;

use crate::construct::Template;

pub const BUCKETS: usize = 128;

#[derive(Debug)]
struct Link {
    key: String,
    template: Arc<Template>,
    next: Option<Box<Link>>,
}

#[derive(Debug)]
pub struct SchemeKeeper {
    buckets: Vec<Option<Box<Link>>>,
    // names in the order they were first kept, for stable listings
    order: Vec<String>,
}

/// DJB2 over the code points of `key`, reduced to a bucket index.
pub fn bucket_of(key: &str) -> usize {
    let hash = key
        .chars()
        .fold(5381i64, |acc, c| acc.wrapping_mul(33).wrapping_add(c as i64));
    (hash.unsigned_abs() % BUCKETS as u64) as usize
}

impl Default for SchemeKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeKeeper {
    pub fn new() -> Self {
        Self {
            buckets: (0..BUCKETS).map(|_| None).collect(),
            order: Vec::new(),
        }
    }

    /// Replaces the template kept under the same name, or chains a new entry
    /// at the head of its bucket. Returns true when the name is new.
    pub fn insert(&mut self, template: Template) -> bool {
        let key = template.name().to_string();
        let bucket = bucket_of(&key);
        let mut cursor = self.buckets[bucket].as_deref_mut();
        while let Some(link) = cursor {
            if link.key == key {
                link.template = Arc::new(template);
                trace!(scheme = %key, bucket, "scheme replaced");
                return false;
            }
            cursor = link.next.as_deref_mut();
        }
        let head = self.buckets[bucket].take();
        self.buckets[bucket] = Some(Box::new(Link {
            key: key.clone(),
            template: Arc::new(template),
            next: head,
        }));
        trace!(scheme = %key, bucket, "scheme kept");
        self.order.push(key);
        true
    }

    pub fn search(&self, name: &str) -> Option<Arc<Template>> {
        let name = name.trim();
        let mut cursor = self.buckets[bucket_of(name)].as_deref();
        while let Some(link) = cursor {
            if link.key == name {
                return Some(Arc::clone(&link.template));
            }
            cursor = link.next.as_deref();
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_some()
    }

    pub fn delete(&mut self, name: &str) -> bool {
        let name = name.trim();
        let bucket = bucket_of(name);
        let removed = unlink(&mut self.buckets[bucket], name);
        if removed {
            self.order.retain(|n| n != name);
            trace!(scheme = %name, bucket, "scheme released");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Kept templates in the order their names were first kept.
    pub fn templates(&self) -> Vec<Arc<Template>> {
        self.order.iter().filter_map(|n| self.search(n)).collect()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / BUCKETS as f64
    }

    /// Entries that share a bucket with an earlier entry.
    pub fn collisions(&self) -> usize {
        self.chain_lengths().map(|n| n.saturating_sub(1)).sum()
    }

    pub fn longest_chain(&self) -> usize {
        self.chain_lengths().max().unwrap_or(0)
    }

    pub fn occupied_buckets(&self) -> usize {
        self.chain_lengths().filter(|n| *n > 0).count()
    }

    fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|head| {
            let mut length = 0;
            let mut cursor = head.as_deref();
            while let Some(link) = cursor {
                length += 1;
                cursor = link.next.as_deref();
            }
            length
        })
    }
}

fn unlink(slot: &mut Option<Box<Link>>, name: &str) -> bool {
    match slot {
        None => false,
        Some(link) if link.key != name => unlink(&mut link.next, name),
        Some(_) => {
            *slot = slot.take().and_then(|link| link.next);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> Template {
        Template::new(name, "1َ2َ3").unwrap()
    }

    #[test]
    fn djb2_buckets() {
        // 5381 % 128 and (5381 * 33 + 97) % 128
        assert_eq!(bucket_of(""), 5);
        assert_eq!(bucket_of("a"), 6);
        assert!(bucket_of("فاعل") < BUCKETS);
    }

    #[test]
    fn two_hundred_names() {
        let mut keeper = SchemeKeeper::new();
        let names: Vec<String> = (0..200).map(|i| format!("scheme{}", i)).collect();
        for n in &names {
            assert!(keeper.insert(template(n)));
        }
        assert_eq!(keeper.len(), 200);
        assert!(keeper.collisions() >= 200 - BUCKETS);
        assert!(keeper.longest_chain() >= 2);
        for n in &names {
            assert!(keeper.contains(n), "{} missing", n);
        }
        assert!(keeper.delete("scheme17"));
        assert!(keeper.search("scheme17").is_none());
        assert!(!keeper.delete("scheme17"));
        assert_eq!(keeper.len(), 199);
        for n in names.iter().filter(|n| n.as_str() != "scheme17") {
            assert!(keeper.contains(n), "{} lost after delete", n);
        }
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut keeper = SchemeKeeper::new();
        assert!(keeper.insert(template("فعل")));
        assert!(!keeper.insert(Template::new("فعل", "1َ2ِ3").unwrap()));
        assert_eq!(keeper.len(), 1);
        assert_eq!(keeper.search("فعل").unwrap().rule(), "1َ2ِ3");
        assert_eq!(keeper.names(), ["فعل".to_string()]);
    }

    #[test]
    fn load_factor_tracks_len() {
        let mut keeper = SchemeKeeper::new();
        assert_eq!(keeper.load_factor(), 0.0);
        for i in 0..64 {
            keeper.insert(template(&format!("t{}", i)));
        }
        assert!((keeper.load_factor() - 0.5).abs() < f64::EPSILON);
        assert_eq!(keeper.occupied_buckets() + keeper.collisions(), 64);
    }
}
