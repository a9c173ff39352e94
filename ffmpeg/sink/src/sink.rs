/*!
    Container muxing into a file.
*/

use std::path::{Path, PathBuf};

use ffmpeg_next::{Codec, Dictionary, codec, ffi, format};
use tracing::debug;

use ffmpeg_source::convert::{rational_from_ffmpeg, rational_to_ffmpeg};
use ffmpeg_types::{Error, Muxer, Packet, Rational, Result};

use crate::config::{ContainerFormat, SinkConfig};

/**
    The single video stream of the output.
*/
#[derive(Clone, Copy, Debug)]
struct OutputStream {
    index: usize,
    time_base: Rational,
}

/**
    A container file being written.

    Setup happens in three steps: [`Sink::file`] creates the file,
    [`Sink::add_video_stream`] declares the stream and
    [`Sink::write_header`] commits both. Only then can packets be written.
*/
pub struct Sink {
    path: PathBuf,
    format: Option<ContainerFormat>,
    fast_start: bool,
    output: format::context::Output,
    stream: Option<OutputStream>,
    header_written: bool,
    finished: bool,
    packets_written: u64,
}

impl Sink {
    /**
        Create the output file at `path`.

        The container comes from the config, else from the file extension,
        else FFmpeg guesses it.
    */
    pub fn file(path: impl AsRef<Path>, config: SinkConfig) -> Result<Self> {
        ffmpeg_source::init()?;

        let path = path.as_ref().to_path_buf();
        let format = config.resolve_format(&path);

        let output = match format {
            Some(container) => format::output_as(&path, container.ffmpeg_format_name()),
            None => format::output(&path),
        }
        .map_err(|e| Error::codec(format!("could not create {}: {e}", path.display())))?;

        debug!(
            path = %path.display(),
            format = output.format().name(),
            "created output"
        );

        Ok(Self {
            path,
            format,
            fast_start: config.fast_start,
            output,
            stream: None,
            header_written: false,
            finished: false,
            packets_written: 0,
        })
    }

    /**
        Path of the output file.
    */
    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        The container being written, if it is one we know.
    */
    pub fn format(&self) -> Option<ContainerFormat> {
        self.format
    }

    /**
        Returns true if the container wants codec headers out of band, so the
        encoder must be opened with a global header.
    */
    pub fn requires_global_header(&self) -> bool {
        self.output
            .format()
            .flags()
            .contains(format::Flags::GLOBAL_HEADER)
    }

    /**
        Number of packets written so far.
    */
    pub fn packets_written(&self) -> u64 {
        self.packets_written
    }

    /**
        Declare the output video stream.

        `parameters` must come from the opened encoder; `time_base` is the
        encoder's and only a hint, since the container may pick its own
        when the header is written.
    */
    pub fn add_video_stream(
        &mut self,
        codec: Codec,
        parameters: &codec::Parameters,
        time_base: Rational,
    ) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::invalid_state("output already has a video stream"));
        }

        let mut stream = self
            .output
            .add_stream(codec)
            .map_err(|e| Error::codec(e.to_string()))?;
        stream.set_time_base(rational_to_ffmpeg(time_base));

        unsafe {
            let codecpar = (*stream.as_mut_ptr()).codecpar;
            let ret = ffi::avcodec_parameters_copy(codecpar, parameters.as_ptr());
            if ret < 0 {
                return Err(Error::codec(ffmpeg_next::Error::from(ret).to_string()));
            }
            // Let the muxer pick the tag for its container
            (*codecpar).codec_tag = 0;
        }

        self.stream = Some(OutputStream {
            index: stream.index(),
            time_base,
        });
        Ok(())
    }

    /**
        Write the container header. The output stream's time base is final
        from here on.
    */
    pub fn write_header(&mut self) -> Result<()> {
        let Some(mut stream) = self.stream else {
            return Err(Error::invalid_state("no output stream added"));
        };
        if self.header_written {
            return Ok(());
        }

        if self.fast_start && self.format == Some(ContainerFormat::Mp4) {
            let mut options = Dictionary::new();
            options.set("movflags", "faststart");
            self.output
                .write_header_with(options)
                .map_err(|e| Error::codec(e.to_string()))?;
        } else {
            self.output
                .write_header()
                .map_err(|e| Error::codec(e.to_string()))?;
        }

        if let Some(written) = self.output.stream(stream.index) {
            stream.time_base = rational_from_ffmpeg(written.time_base());
        }
        self.stream = Some(stream);
        self.header_written = true;

        debug!(
            stream = stream.index,
            time_base = %stream.time_base,
            fast_start = self.fast_start,
            "wrote output header"
        );
        Ok(())
    }
}

impl Muxer for Sink {
    fn time_base(&self) -> Rational {
        self.stream
            .map(|stream| stream.time_base)
            .unwrap_or(Rational::new(0, 1))
    }

    fn stream_index(&self) -> usize {
        self.stream.map(|stream| stream.index).unwrap_or(0)
    }

    fn write(&mut self, mut packet: Packet) -> Result<()> {
        let Some(stream) = self.stream.filter(|_| self.header_written) else {
            return Err(Error::invalid_state("output header not written"));
        };
        if self.finished {
            return Err(Error::invalid_state("output already finished"));
        }

        if packet.time_base != stream.time_base {
            packet.rescale_to(stream.time_base);
        }

        let mut ffmpeg_pkt = ffmpeg_next::Packet::copy(&packet.data);
        ffmpeg_pkt.set_stream(stream.index);
        ffmpeg_pkt.set_pts(packet.pts.map(|pts| pts.0));
        ffmpeg_pkt.set_dts(packet.dts.map(|dts| dts.0));
        ffmpeg_pkt.set_duration(packet.duration.0);
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        ffmpeg_pkt
            .write_interleaved(&mut self.output)
            .map_err(|e| Error::codec(e.to_string()))?;
        self.packets_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        if !self.header_written {
            return Err(Error::invalid_state("output header not written"));
        }

        self.output
            .write_trailer()
            .map_err(|e| Error::codec(e.to_string()))?;
        self.finished = true;

        debug!(
            path = %self.path.display(),
            packets = self.packets_written,
            "finished output"
        );
        Ok(())
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("stream", &self.stream)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
