//! Search provider: compile, execute, lift

use opensearch_compiler::{CompilerOptions, FieldCatalog, RequestCompiler, ResponseCompiler};
use search_model::{SearchRequest, SearchResponse};

use crate::client::SearchEngine;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SearchProvider<E> {
    engine: E,
    request_compiler: RequestCompiler,
    response_compiler: ResponseCompiler,
}

impl<E: SearchEngine> SearchProvider<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, CompilerOptions::default())
    }

    pub fn with_options(engine: E, options: CompilerOptions) -> Self {
        Self {
            engine,
            request_compiler: RequestCompiler::new(options),
            response_compiler: ResponseCompiler,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run `request` against `index`. Only engine failures are errors.
    pub async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
        fields: &FieldCatalog,
    ) -> Result<SearchResponse> {
        let query = self.request_compiler.compile(Some(request), index, fields);
        let result = self.engine.search(&query).await?;
        let response = self.response_compiler.compile(result, Some(request));

        tracing::debug!(
            index,
            total_count = response.total_count,
            documents = response.documents.len(),
            aggregations = response.aggregations.len(),
            "search completed"
        );
        Ok(response)
    }
}
