use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Module, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use ns_core::config::InferenceConfig;
use ns_core::{Error, Result, Sentiment, SentimentLabel};
use serde::Deserialize;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{
    DecoderWrapper, Model, ModelWrapper, NormalizerWrapper, PostProcessorWrapper,
    PreTokenizerWrapper, TokenizerBuilder, TokenizerImpl, TruncationParams,
};
use tracing::{debug, info};

use super::{best_label, SentimentModel};

const HUB_URL: &str = "https://huggingface.co";
const CONFIG_FILE: &str = "config.json";
const VOCAB_FILE: &str = "vocab.txt";
const WEIGHTS_FILE: &str = "pytorch_model.bin";
const MODEL_FILES: [&str; 3] = [CONFIG_FILE, VOCAB_FILE, WEIGHTS_FILE];

type BertTokenizer = TokenizerImpl<
    ModelWrapper,
    NormalizerWrapper,
    PreTokenizerWrapper,
    PostProcessorWrapper,
    DecoderWrapper,
>;

#[derive(Deserialize)]
struct LabelConfig {
    id2label: HashMap<String, String>,
}

fn load_error(what: &str) -> impl Fn(candle_core::Error) -> Error + '_ {
    move |e| Error::ModelLoad(format!("failed to load {}: {}", what, e))
}

/// Labels ordered by class index, from the `id2label` table of `config.json`.
fn ordered_labels(id2label: &HashMap<String, String>) -> Result<Vec<SentimentLabel>> {
    let mut indexed = id2label
        .iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, SentimentLabel::parse(label)))
                .map_err(|_| Error::ModelLoad(format!("invalid label id '{}' in {}", id, CONFIG_FILE)))
        })
        .collect::<Result<Vec<_>>>()?;
    indexed.sort_by_key(|(id, _)| *id);

    if indexed.is_empty() || indexed.iter().enumerate().any(|(i, (id, _))| i != *id) {
        return Err(Error::ModelLoad(format!(
            "{} must map every class index from 0 to a label",
            CONFIG_FILE
        )));
    }
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

fn build_tokenizer(vocab: &Path, max_length: usize) -> Result<BertTokenizer> {
    let vocab_path = vocab
        .to_str()
        .ok_or_else(|| Error::ModelLoad(format!("non UTF-8 vocab path {:?}", vocab)))?;
    let wordpiece = WordPiece::from_file(vocab_path)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::ModelLoad(format!("failed to read {}: {}", VOCAB_FILE, e)))?;

    let special = |token: &str| {
        wordpiece
            .token_to_id(token)
            .ok_or_else(|| Error::ModelLoad(format!("{} has no {} token", VOCAB_FILE, token)))
    };
    let cls = special("[CLS]")?;
    let sep = special("[SEP]")?;

    TokenizerBuilder::<ModelWrapper, NormalizerWrapper, PreTokenizerWrapper, PostProcessorWrapper, DecoderWrapper>::new()
        .with_model(wordpiece.into())
        .with_normalizer(Some(BertNormalizer::new(true, true, None, true).into()))
        .with_pre_tokenizer(Some(BertPreTokenizer.into()))
        .with_post_processor(Some(
            BertProcessing::new(("[SEP]".to_string(), sep), ("[CLS]".to_string(), cls)).into(),
        ))
        .with_decoder(None)
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .build()
        .map_err(|e| Error::ModelLoad(format!("failed to build tokenizer: {}", e)))
}

/// BERT encoder with the pooler and sequence-classification head on top.
struct Classifier {
    bert: BertModel,
    pooler: Linear,
    head: Linear,
    tokenizer: BertTokenizer,
    labels: Vec<SentimentLabel>,
    device: Device,
}

impl Classifier {
    fn load(dir: &Path, device: Device) -> Result<Self> {
        let raw_config = std::fs::read_to_string(dir.join(CONFIG_FILE))
            .map_err(|e| Error::ModelLoad(format!("failed to read {}: {}", CONFIG_FILE, e)))?;
        let bert_config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| Error::ModelLoad(format!("invalid {}: {}", CONFIG_FILE, e)))?;
        let label_config: LabelConfig = serde_json::from_str(&raw_config)
            .map_err(|e| Error::ModelLoad(format!("invalid {}: {}", CONFIG_FILE, e)))?;
        let labels = ordered_labels(&label_config.id2label)?;

        let tokenizer = build_tokenizer(&dir.join(VOCAB_FILE), bert_config.max_position_embeddings)?;

        let vb = VarBuilder::from_pth(dir.join(WEIGHTS_FILE), DType::F32, &device)
            .map_err(load_error(WEIGHTS_FILE))?;
        let hidden = bert_config.hidden_size;
        let bert = BertModel::load(vb.pp("bert"), &bert_config).map_err(load_error("BERT encoder"))?;
        let pooler = linear(hidden, hidden, vb.pp("bert.pooler.dense")).map_err(load_error("pooler"))?;
        let head = linear(hidden, labels.len(), vb.pp("classifier")).map_err(load_error("classifier head"))?;

        Ok(Self {
            bert,
            pooler,
            head,
            tokenizer,
            labels,
            device,
        })
    }

    fn probabilities(&self, ids: &[u32], type_ids: &[u32], mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;

        let hidden_state = self.bert.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let cls = hidden_state.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.head.forward(&pooled)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()
    }

    fn predict(&self, text: &str) -> Result<Sentiment> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::Inference(format!("tokenization failed: {}", e)))?;
        let probs = self
            .probabilities(
                encoding.get_ids(),
                encoding.get_type_ids(),
                encoding.get_attention_mask(),
            )
            .map_err(|e| Error::Inference(format!("forward pass failed: {}", e)))?;
        debug!("{} tokens -> {:?}", encoding.get_ids().len(), probs);
        best_label(self.labels.iter().cloned().zip(probs))
    }
}

/// Download any of the model files missing from `dir`.
async fn ensure_model_files(dir: &Path, model_id: &str) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    for file in MODEL_FILES {
        let path = dir.join(file);
        if tokio::fs::try_exists(&path).await? {
            continue;
        }
        let url = format!("{}/{}/resolve/main/{}", HUB_URL, model_id, file);
        info!("⬇️ Downloading {} from {}", file, url);
        let bytes = reqwest::get(&url).await?.error_for_status()?.bytes().await?;
        tokio::fs::write(&path, &bytes).await?;
        info!("Saved {} ({} bytes) to {}", file, bytes.len(), path.display());
    }
    Ok(())
}

pub struct FinBertModel {
    classifier: Arc<Classifier>,
    model_dir: PathBuf,
}

impl fmt::Debug for FinBertModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinBertModel")
            .field("model_dir", &self.model_dir)
            .field("labels", &self.classifier.labels)
            .finish()
    }
}

impl FinBertModel {
    /// Fetch the weights if needed and load them into memory.
    pub async fn load(config: &InferenceConfig) -> Result<Self> {
        let start = Instant::now();
        ensure_model_files(&config.model_dir, &config.model_id)
            .await
            .map_err(|e| Error::ModelLoad(format!("could not fetch {}: {}", config.model_id, e)))?;
        let download_done = Instant::now();

        let dir = config.model_dir.clone();
        let classifier = tokio::task::spawn_blocking(move || Classifier::load(&dir, Device::Cpu))
            .await
            .map_err(|e| Error::External(anyhow!("model loading task failed: {}", e)))??;

        info!(
            "Loaded {} with labels {:?}: files {:?}, weights {:?}",
            config.model_id,
            classifier.labels,
            download_done.duration_since(start),
            download_done.elapsed()
        );
        Ok(Self {
            classifier: Arc::new(classifier),
            model_dir: config.model_dir.clone(),
        })
    }
}

#[async_trait]
impl SentimentModel for FinBertModel {
    fn name(&self) -> &str {
        "FinBERT"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let classifier = self.classifier.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || classifier.predict(&text))
            .await
            .map_err(|e| Error::External(anyhow!("inference task failed: {}", e)))?
    }
}
