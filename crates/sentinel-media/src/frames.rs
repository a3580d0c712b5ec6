//! Frame sources for video analysis.
//!
//! A [`FrameSource`] yields frames on demand, in order, exactly once.
//! `Ok(None)` marks the normal end of the stream; any error is fatal to the
//! run that is reading it.

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use sentinel_models::ImageData;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{spawn_ffmpeg, FfmpegCommand};
use crate::error::{FrameSourceError, FrameSourceResult, MediaError};
use crate::probe::{probe_video, VideoInfo};

const PIPE_OUTPUT: &str = "pipe:1";
const READ_CHUNK: usize = 64 * 1024;

/// One decoded video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: ImageData,
    /// Zero-based index among all decoded frames
    pub index: u64,
    /// Approximate frames per second of the stream
    pub fps: f64,
}

impl Frame {
    /// Seconds from the start of the video; the raw index when fps is unknown.
    pub fn timestamp(&self) -> f64 {
        if self.fps > 0.0 {
            self.index as f64 / self.fps
        } else {
            self.index as f64
        }
    }
}

/// A lazy, finite, non-restartable sequence of frames.
#[async_trait]
pub trait FrameSource: Send {
    /// Stream properties known before reading.
    fn info(&self) -> &VideoInfo;

    /// Next frame, or `None` at the end of the stream.
    async fn next_frame(&mut self) -> FrameSourceResult<Option<Frame>>;
}

/// Frames held in memory, for tests and pre-decoded input.
#[derive(Debug)]
pub struct MemoryFrameSource {
    info: VideoInfo,
    queue: VecDeque<FrameSourceResult<Frame>>,
}

impl MemoryFrameSource {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info,
            queue: VecDeque::new(),
        }
    }

    /// One frame per image, indexed from zero at the stream's fps.
    pub fn from_images(info: VideoInfo, images: impl IntoIterator<Item = ImageData>) -> Self {
        let fps = info.fps;
        let mut source = Self::new(info);
        for (index, image) in images.into_iter().enumerate() {
            source.queue.push_back(Ok(Frame {
                image,
                index: index as u64,
                fps,
            }));
        }
        source
    }

    /// Fail with `error` once the frames queued so far are consumed.
    pub fn push_error(mut self, error: FrameSourceError) -> Self {
        self.queue.push_back(Err(error));
        self
    }
}

#[async_trait]
impl FrameSource for MemoryFrameSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    async fn next_frame(&mut self) -> FrameSourceResult<Option<Frame>> {
        self.queue.pop_front().transpose()
    }
}

/// Frames decoded by a running FFmpeg process.
///
/// FFmpeg keeps every `sample_rate`-th frame (0, N, 2N, ...) and writes it as
/// a JPEG to its stdout. Each [`FrameSource::next_frame`] call reads only as
/// much of that stream as the next image needs, so frames are decoded while
/// the timeline consumes them and nothing is written to disk. Dropping the
/// source kills the process.
pub struct FfmpegFrameSource {
    info: VideoInfo,
    sample_rate: u64,
    process: Option<FrameProcess>,
    splitter: JpegSplitter,
    chunk: Vec<u8>,
    next_ordinal: u64,
}

struct FrameProcess {
    child: Child,
    stdout: ChildStdout,
    stderr: JoinHandle<Vec<u8>>,
}

impl FfmpegFrameSource {
    /// Probe `path` and start decoding its sampled frames.
    pub async fn open(path: impl AsRef<Path>, sample_rate: u64) -> FrameSourceResult<Self> {
        let path = path.as_ref();
        let sample_rate = sample_rate.max(1);
        let info = probe_video(path).await?;

        let cmd = FfmpegCommand::new(path, PIPE_OUTPUT)
            .video_filter(sample_filter(sample_rate))
            .variable_frame_rate()
            .jpeg_pipe()
            .jpeg_quality(2);
        let mut child = spawn_ffmpeg(&cmd)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("FFmpeg stdout not captured", None, None))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("FFmpeg stderr not captured", None, None))?;
        let stderr = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });

        info!(
            path = %path.display(),
            frame_count = info.frame_count,
            fps = info.fps,
            sample_rate,
            "Started frame decoding"
        );

        Ok(Self {
            info,
            sample_rate,
            process: Some(FrameProcess {
                child,
                stdout,
                stderr,
            }),
            splitter: JpegSplitter::default(),
            chunk: vec![0; READ_CHUNK],
            next_ordinal: 0,
        })
    }

    /// Reap the process once its stdout is exhausted.
    async fn finish(&mut self, mut process: FrameProcess) -> FrameSourceResult<()> {
        let status = process.child.wait().await?;
        let stderr = process.stderr.await.unwrap_or_default();

        if !status.success() {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(String::from_utf8_lossy(&stderr).to_string()),
                status.code(),
            ));
        }
        if !self.splitter.is_empty() {
            warn!(
                bytes = self.splitter.pending(),
                "Discarding truncated frame at end of stream"
            );
        }
        if self.next_ordinal == 0 && self.info.frame_count > 0 {
            return Err(MediaError::invalid_video(
                "no frames could be decoded from the video",
            ));
        }

        info!(sampled = self.next_ordinal, "Frame decoding finished");
        Ok(())
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    async fn next_frame(&mut self) -> FrameSourceResult<Option<Frame>> {
        loop {
            if let Some(bytes) = self.splitter.next_image()? {
                let index = self.next_ordinal * self.sample_rate;
                self.next_ordinal += 1;
                debug!(index, size = bytes.len(), "Decoded frame");

                return Ok(Some(Frame {
                    image: ImageData::jpeg(bytes),
                    index,
                    fps: self.info.fps,
                }));
            }

            let Some(process) = self.process.as_mut() else {
                return Ok(None);
            };
            let read = process.stdout.read(&mut self.chunk).await?;
            if read == 0 {
                if let Some(process) = self.process.take() {
                    self.finish(process).await?;
                }
                return Ok(None);
            }
            self.splitter.push(&self.chunk[..read]);
        }
    }
}

/// FFmpeg select filter keeping frames whose number is a multiple of `sample_rate`.
pub fn sample_filter(sample_rate: u64) -> String {
    format!("select='not(mod(n\\,{}))'", sample_rate.max(1))
}

/// Cuts a concatenated stream of JPEG images at image boundaries.
#[derive(Debug, Default)]
pub struct JpegSplitter {
    buf: Vec<u8>,
}

impl JpegSplitter {
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete image, or `None` until more bytes arrive.
    pub fn next_image(&mut self) -> FrameSourceResult<Option<Vec<u8>>> {
        let Some(end) = jpeg_length(&self.buf)? else {
            return Ok(None);
        };
        let rest = self.buf.split_off(end);
        Ok(Some(std::mem::replace(&mut self.buf, rest)))
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes buffered toward the next image.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Length of the JPEG image at the start of `data`, or `None` if incomplete.
///
/// Segments are walked by their length fields so table bytes never end an
/// image early. Inside scan data `FF 00` is a stuffed byte and `FF D0`-`FF D7`
/// are restart markers; any other marker ends the scan.
fn jpeg_length(data: &[u8]) -> FrameSourceResult<Option<usize>> {
    if data.len() < 2 {
        return Ok(None);
    }
    if data[..2] != [0xFF, 0xD8] {
        return Err(MediaError::invalid_video("frame stream is not JPEG"));
    }

    let mut pos = 2;
    loop {
        if pos + 2 > data.len() {
            return Ok(None);
        }
        if data[pos] != 0xFF {
            return Err(MediaError::invalid_video(format!(
                "malformed JPEG marker at byte {}",
                pos
            )));
        }

        let marker = data[pos + 1];
        match marker {
            // Fill byte before a marker
            0xFF => {
                pos += 1;
                continue;
            }
            0xD9 => return Ok(Some(pos + 2)),
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        if pos + 4 > data.len() {
            return Ok(None);
        }
        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 {
            return Err(MediaError::invalid_video(format!(
                "invalid JPEG segment length at byte {}",
                pos
            )));
        }
        pos += 2 + length;

        if marker == 0xDA {
            loop {
                if pos + 2 > data.len() {
                    return Ok(None);
                }
                let next = data[pos + 1];
                if data[pos] == 0xFF && next != 0x00 && !(0xD0..=0xD7).contains(&next) {
                    break;
                }
                pos += 1;
            }
        }
    }
}
