//! Ordered collection of waveguide paths addressed by index.

use crate::render::Renderer;
use crate::waveguide::WaveguidePath;
use cpwkit_core::Result;
use std::ops::{Index, IndexMut};
use tracing::info;

/// Paths of one device, in insertion order.
#[derive(Debug)]
pub struct PathSet<R: Renderer> {
    paths: Vec<WaveguidePath<R>>,
}

impl<R: Renderer> Default for PathSet<R> {
    fn default() -> Self {
        Self { paths: Vec::new() }
    }
}

impl<R: Renderer> PathSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path and returns its index.
    pub fn push(&mut self, path: WaveguidePath<R>) -> usize {
        self.paths.push(path);
        self.paths.len() - 1
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WaveguidePath<R>> {
        self.paths.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WaveguidePath<R>> {
        self.paths.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaveguidePath<R>> {
        self.paths.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WaveguidePath<R>> {
        self.paths.iter_mut()
    }

    /// Total centreline length of every path.
    pub fn total_length(&self) -> f64 {
        self.paths.iter().map(WaveguidePath::length).sum()
    }

    /// Ends every live path into `sink`, in index order. Returns how many
    /// paths were ended.
    pub fn end_all(&mut self, sink: &mut R::Sink) -> Result<usize> {
        let mut ended = 0;
        for path in self.paths.iter_mut().filter(|p| p.is_live()) {
            path.end(sink)?;
            ended += 1;
        }
        info!("Ended {} of {} paths", ended, self.paths.len());
        Ok(ended)
    }
}

impl<R: Renderer> Index<usize> for PathSet<R> {
    type Output = WaveguidePath<R>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.paths[index]
    }
}

impl<R: Renderer> IndexMut<usize> for PathSet<R> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.paths[index]
    }
}

impl<R: Renderer> FromIterator<WaveguidePath<R>> for PathSet<R> {
    fn from_iter<I: IntoIterator<Item = WaveguidePath<R>>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
